//! HTTP basic authentication for the EPC API.
//!
//! The API authenticates every request with the account e-mail and API key,
//! sent as a `Basic` credential. Credentials come from the config file's
//! `email`/`api_key` when set, otherwise from `EPC_EMAIL` and `EPC_API_KEY`.

use crate::constants::{API_KEY_ENV_VAR, EMAIL_ENV_VAR};
use crate::errors::{AppError, AppResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// Account identity and secret used to authenticate against the API.
#[derive(Clone)]
pub struct Credentials {
    identity: String,
    secret: String,
}

impl Credentials {
    /// Creates credentials, rejecting empty values.
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> AppResult<Self> {
        let identity = identity.into();
        let secret = secret.into();

        if identity.is_empty() {
            return Err(AppError::Configuration(format!(
                "Missing {EMAIL_ENV_VAR} environment variable"
            )));
        }
        if secret.is_empty() {
            return Err(AppError::Configuration(format!(
                "Missing {API_KEY_ENV_VAR} environment variable"
            )));
        }

        Ok(Self { identity, secret })
    }

    /// Reads credentials from `EPC_EMAIL` and `EPC_API_KEY`.
    pub fn from_env() -> AppResult<Self> {
        Self::resolve(None, None)
    }

    /// Resolves credentials from config file values, falling back to the
    /// environment for any value the file leaves unset.
    ///
    /// File values override `EPC_EMAIL`/`EPC_API_KEY`. An empty value on
    /// either side counts as missing.
    pub fn resolve(identity: Option<&str>, secret: Option<&str>) -> AppResult<Self> {
        let identity = file_or_env(identity, EMAIL_ENV_VAR);
        let secret = file_or_env(secret, API_KEY_ENV_VAR);
        Self::new(identity, secret)
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}

fn file_or_env(file_value: Option<&str>, var: &str) -> String {
    match file_value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => std::env::var(var).unwrap_or_default(),
    }
}

/// Value of the `Authorization` header sent with every request.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader(String);

impl AuthHeader {
    /// Builds `Basic base64(identity:secret)`.
    pub fn basic(credentials: &Credentials) -> Self {
        let token = STANDARD.encode(format!("{}:{}", credentials.identity, credentials.secret));
        Self(format!("Basic {token}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthHeader(Basic <redacted>)")
    }
}
