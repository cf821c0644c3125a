use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_CONFIG_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_PAGE_SIZE,
};
use crate::errors::{AppError, AppResult};
use crate::models::Endpoint;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolved configuration with all run settings filled in.
///
/// Every field has a default, so a config file only needs the keys it wants to
/// change. Credentials are the exception: `email`/`api_key` are unset by
/// default and, when set, take precedence over the environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    /// Root directory; one subdirectory per postcode is created beneath it
    pub output_dir: PathBuf,
    /// Base URL of the EPC API
    pub base_url: String,
    /// Search endpoints queried for each postcode, in order
    pub endpoints: Vec<Endpoint>,
    /// Rows requested per page
    pub page_size: u32,
    /// Upper bound on page requests per endpoint. Unset means unbounded.
    pub max_pages: Option<u32>,
    /// Per-request timeout in seconds. Unset leaves the transport default.
    pub request_timeout_secs: Option<u64>,
    /// Fallback for `EPC_EMAIL`
    pub email: Option<String>,
    /// Fallback for `EPC_API_KEY`
    pub api_key: Option<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoints: vec![Endpoint::Domestic],
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: None,
            request_timeout_secs: None,
            email: None,
            api_key: None,
        }
    }
}

impl ResolvedConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `Parse` if the TOML is malformed
    /// or contains unknown keys, and `Configuration` if a value is out of range.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Io(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config: ResolvedConfig = toml::from_str(&contents)
            .map_err(|e| AppError::Parse(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads the explicit config file if given, else `epc.toml` in the working
    /// directory if present, else the defaults.
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        match explicit {
            Some(path) => Self::from_toml_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_toml_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> AppResult<()> {
        if self.page_size == 0 {
            return Err(AppError::Configuration(
                "Page size must be greater than 0".into(),
            ));
        }
        if self.max_pages == Some(0) {
            return Err(AppError::Configuration(
                "Max pages must be greater than 0 when set".into(),
            ));
        }
        if self.endpoints.is_empty() {
            return Err(AppError::Configuration(
                "At least one endpoint must be configured".into(),
            ));
        }
        Ok(())
    }
}
