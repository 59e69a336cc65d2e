//! Error types for RailPay
//!
//! One taxonomy for the whole core. The propagation policy: nothing
//! here may silently swallow a failure that could mask a moved-money
//! outcome. A transfer whose fate is unknown (timeout after the request
//! was sent) is `UnknownOutcome`, never `Upstream` or `Timeout`, so the
//! caller polls status with the same reference instead of retrying with
//! a fresh one.

use thiserror::Error;

/// Result type for RailPay operations
pub type Result<T> = std::result::Result<T, RailPayError>;

/// RailPay error types
#[derive(Debug, Clone, Error)]
pub enum RailPayError {
    /// Operation attempted before `initialize`: a configuration bug in
    /// the caller's startup wiring, fatal to the call, not the process
    #[error("Provider {provider} not initialized")]
    UninitializedProvider { provider: String },

    /// Token acquisition failed (bad credentials, unreachable token
    /// endpoint). Not retried here; retry policy belongs to the caller.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Non-2xx response from a rail or proxy; body preserved for audit
    #[error("Upstream error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Transport-level failure before any response arrived
    #[error("Network error: {message}")]
    Network { message: String },

    /// Request exceeded its deadline before the rail answered
    #[error("Request timed out during {operation}")]
    Timeout { operation: String },

    /// Transfer request timed out after it may have been sent: the
    /// outcome is unknown and must be resolved via a status poll
    #[error("Transfer outcome unknown for reference {reference}, poll status before retrying")]
    UnknownOutcome { reference: String },

    /// Malformed input; never retried
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Provider cannot perform this operation
    #[error("Provider {provider} does not support {operation}")]
    UnsupportedOperation { provider: String, operation: String },

    /// Missing or inconsistent configuration, detected at startup
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl RailPayError {
    /// Create an uninitialized-provider error
    pub fn uninitialized(provider: impl Into<String>) -> Self {
        Self::UninitializedProvider {
            provider: provider.into(),
        }
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this is a retriable error.
    ///
    /// `UnknownOutcome` is deliberately not retriable: the caller must
    /// poll status with the original reference first.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Get an error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UninitializedProvider { .. } => "PROVIDER_NOT_INITIALIZED",
            Self::Authentication { .. } => "AUTHENTICATION_FAILED",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::UnknownOutcome { .. } => "UNKNOWN_OUTCOME",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::UnsupportedOperation { .. } => "UNSUPPORTED_OPERATION",
            Self::Config { .. } => "CONFIGURATION_ERROR",
        }
    }
}
