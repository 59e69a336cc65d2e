//! NIBSS configuration
//!
//! All values are injected; `from_env` exists for the application's
//! startup routine only, so business logic stays unit-testable.

use serde::{Deserialize, Serialize};

use railpay_types::{RailPayError, Result};

/// Deployment environment. Controls whether development-only options
/// (mock rail, TLS relaxation) are even allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::Sandbox
    }
}

/// NIBSS credentials and endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NibssConfig {
    pub base_url: String,
    /// OAuth2 client id
    pub client_id: String,
    /// OAuth2 client secret; also keys request and payload signatures
    pub client_secret: String,
    pub api_key: String,
    /// Institution code of the originating organization
    pub organization_code: String,
    pub environment: Environment,
    pub request_timeout_secs: u64,
}

impl Default for NibssConfig {
    fn default() -> Self {
        Self {
            base_url: "https://apitest.nibss-plc.com.ng".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            api_key: String::new(),
            organization_code: String::new(),
            environment: Environment::Sandbox,
            request_timeout_secs: 30,
        }
    }
}

impl NibssConfig {
    /// Read configuration from `NIBSS_*` environment variables.
    /// Startup-routine use only.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("NIBSS_BASE_URL").unwrap_or(defaults.base_url),
            client_id: std::env::var("NIBSS_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("NIBSS_CLIENT_SECRET").unwrap_or_default(),
            api_key: std::env::var("NIBSS_API_KEY").unwrap_or_default(),
            organization_code: std::env::var("NIBSS_ORG_CODE").unwrap_or_default(),
            environment: match std::env::var("NIBSS_ENV").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Sandbox,
            },
            request_timeout_secs: defaults.request_timeout_secs,
        }
    }

    /// Fail fast on configuration a signed request cannot work without
    pub fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() {
            return Err(RailPayError::config("NIBSS client_id is not set"));
        }
        if self.client_secret.is_empty() {
            return Err(RailPayError::config("NIBSS client_secret is not set"));
        }
        if self.base_url.is_empty() {
            return Err(RailPayError::config("NIBSS base_url is not set"));
        }
        Ok(())
    }
}
