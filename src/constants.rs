// Data source URLs
pub const DEFAULT_BASE_URL: &str = "https://epc.opendatacommunities.org/api/v1";
pub const DOMESTIC_SEARCH_PATH: &str = "domestic/search";
pub const DISPLAY_SEARCH_PATH: &str = "display/search";

// Credentials
pub const EMAIL_ENV_VAR: &str = "EPC_EMAIL";
pub const API_KEY_ENV_VAR: &str = "EPC_API_KEY";

// Defaults
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_CONFIG_FILE: &str = "epc.toml";
pub const UNKNOWN_IDENTIFIER: &str = "unknown";

// Interactive prompt
pub const POSTCODE_PROMPT: &str = "Enter UK postcode (e.g. SW1A 1AA): ";

// Endpoint aliases
pub const DOMESTIC_ALIASES: &[&str] = &["domestic", "dom"];
pub const DISPLAY_ALIASES: &[&str] = &["display", "dec", "non-domestic"];
pub const ALL_ENDPOINTS_ALIASES: &[&str] = &["all", "both"];
