use crate::constants::*;
use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

/// A single certificate as returned by the API.
///
/// The upstream schema is not fixed, so rows are kept as an ordered JSON object
/// and written back out verbatim.
pub type CertificateRow = Map<String, Value>;

/// EPC search endpoint to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Domestic Energy Performance Certificates
    Domestic,
    /// Display Energy Certificates for public buildings
    Display,
}

impl Endpoint {
    /// Returns a human-readable name for the endpoint.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Domestic => "Domestic",
            Self::Display => "Display",
        }
    }

    /// Returns the search path relative to the API base URL.
    pub fn search_path(&self) -> &'static str {
        match self {
            Self::Domestic => DOMESTIC_SEARCH_PATH,
            Self::Display => DISPLAY_SEARCH_PATH,
        }
    }

    /// Resolves the full search URL against `base_url`.
    ///
    /// A missing trailing slash on the base is tolerated, so both
    /// `https://host/api/v1` and `https://host/api/v1/` resolve to
    /// `https://host/api/v1/domestic/search`.
    pub fn search_url(&self, base_url: &str) -> AppResult<Url> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(self.search_path())?)
    }

    /// Parses an endpoint selection, expanding `all` to every endpoint.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn parse_selection(value: &str) -> AppResult<Vec<Endpoint>> {
        let lower = value.trim().to_lowercase();

        if DOMESTIC_ALIASES.contains(&lower.as_str()) {
            Ok(vec![Self::Domestic])
        } else if DISPLAY_ALIASES.contains(&lower.as_str()) {
            Ok(vec![Self::Display])
        } else if ALL_ENDPOINTS_ALIASES.contains(&lower.as_str()) {
            Ok(vec![Self::Domestic, Self::Display])
        } else {
            Err(AppError::InvalidInput(format!(
                "Unknown endpoint '{value}'. Expected one of: domestic, display, all"
            )))
        }
    }
}

/// Returns the identifier used to name the output file for `row`.
///
/// Uses the `uprn` field: strings are taken verbatim and numbers are rendered
/// in decimal. Anything else, including a missing, empty or whitespace-only
/// value, yields `"unknown"`. Path separators are replaced so the file always lands inside
/// the postcode directory.
pub fn record_identifier(row: &CertificateRow) -> String {
    let raw = match row.get("uprn") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return UNKNOWN_IDENTIFIER.to_string(),
    };

    raw.replace(['/', '\\'], "_")
}
