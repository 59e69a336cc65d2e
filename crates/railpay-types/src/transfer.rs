//! Transfer, account-validation, and status types
//!
//! These are the request/response shapes every payment provider speaks,
//! independent of the wire format of the underlying rail.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bank::BankCodeType;
use crate::currency::Currency;

// ============================================================================
// Provider capabilities & operations
// ============================================================================

/// What a payment provider can do; used for routing and `is_supported`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    pub supports_account_validation: bool,
    pub supports_instant_transfer: bool,
    pub supports_scheduled_transfer: bool,
    pub supports_international_transfer: bool,
    pub supported_currencies: Vec<Currency>,
    /// ISO 3166-1 alpha-2 country codes
    pub supported_countries: Vec<String>,
    /// e.g. "instant", "1-2 hours", "1-3 days"
    pub average_processing_time: String,
}

/// Operations a caller may probe via `is_supported`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderOperation {
    Validate,
    Transfer,
    Status,
    Banks,
}

impl fmt::Display for ProviderOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validate => "validate",
            Self::Transfer => "transfer",
            Self::Status => "status",
            Self::Banks => "banks",
        };
        write!(f, "{s}")
    }
}

// ============================================================================
// Account validation
// ============================================================================

/// Name-enquiry request against a destination account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountValidationRequest {
    pub account_number: String,
    pub bank_code: String,
    pub bank_code_type: BankCodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Outcome of a name enquiry. Invalid accounts are a result, not an
/// error: the rail answered, the account just doesn't resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountValidationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AccountValidationResult {
    /// A successful enquiry resolving to an account name
    pub fn valid(
        account_name: impl Into<String>,
        account_number: impl Into<String>,
        bank_name: impl Into<String>,
    ) -> Self {
        Self {
            is_valid: true,
            account_name: Some(account_name.into()),
            account_number: Some(account_number.into()),
            bank_name: Some(bank_name.into()),
            error_code: None,
            error_message: None,
        }
    }

    /// A failed enquiry with the rail's error code
    pub fn invalid(error_code: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            account_name: None,
            account_number: None,
            bank_name: None,
            error_code: Some(error_code.into()),
            error_message: Some(error_message.into()),
        }
    }
}

// ============================================================================
// Transfers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferType {
    Internal,
    External,
    International,
}

/// Lifecycle state of a transfer as reported by the rail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Reversed,
}

impl TransferStatus {
    /// Whether the rail will not change this status again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Reversed)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Reversed => "reversed",
        };
        write!(f, "{s}")
    }
}

/// A money-movement request.
///
/// `reference` is the caller-supplied idempotency key: replaying the
/// same reference must return the original outcome, never move funds
/// twice. Concrete providers enforce or document this against their
/// rail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    // Source account
    pub from_account_number: String,
    pub from_account_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_bank_code: Option<String>,

    // Destination account
    pub to_account_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_account_name: Option<String>,
    pub to_bank_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_bank_name: Option<String>,

    // Transfer details
    pub amount: Decimal,
    pub currency: Currency,
    pub narration: String,
    pub reference: String,
    pub transfer_type: TransferType,

    // Metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Outcome of a transfer request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResponse {
    pub success: bool,
    pub transaction_reference: String,
    /// The rail's own reference (e.g. a NIP session id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_reference: Option<String>,
    pub status: TransferStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<DateTime<Utc>>,
}

impl TransferResponse {
    /// A definite failure reported by the rail
    pub fn failed(
        reference: impl Into<String>,
        error_code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            transaction_reference: reference.into(),
            provider_reference: None,
            status: TransferStatus::Failed,
            message: Some(message.into()),
            error_code: Some(error_code.into()),
            fee: None,
            total_amount: None,
            estimated_completion: None,
        }
    }
}

/// Status lookup by reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferStatusRequest {
    pub transaction_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferStatusResponse {
    pub transaction_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_reference: Option<String>,
    pub status: TransferStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

// ============================================================================
// Bank lists & limits
// ============================================================================

/// Filter for a provider's bank list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Per-provider transfer limits in the rail's currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLimits {
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub daily_limit: Decimal,
    pub monthly_limit: Decimal,
    pub currency: Currency,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_terminal_statuses() {
        assert!(TransferStatus::Completed.is_terminal());
        assert!(TransferStatus::Reversed.is_terminal());
        assert!(!TransferStatus::Pending.is_terminal());
        assert!(!TransferStatus::Processing.is_terminal());
    }

    #[test]
    fn test_validation_result_constructors() {
        let ok = AccountValidationResult::valid("JOHN DOE", "0123456789", "Zenith Bank");
        assert!(ok.is_valid);
        assert_eq!(ok.account_name.as_deref(), Some("JOHN DOE"));
        assert!(ok.error_code.is_none());

        let bad = AccountValidationResult::invalid("07", "Invalid account");
        assert!(!bad.is_valid);
        assert_eq!(bad.error_code.as_deref(), Some("07"));
    }

    #[test]
    fn test_transfer_response_failed() {
        let resp = TransferResponse::failed("FM01ABC", "INVALID_CURRENCY", "unsupported");
        assert!(!resp.success);
        assert_eq!(resp.status, TransferStatus::Failed);
        assert_eq!(resp.fee, None);
    }

    #[test]
    fn test_limits_serialize_round() {
        let limits = TransferLimits {
            min_amount: dec!(100),
            max_amount: dec!(10_000_000),
            daily_limit: dec!(50_000_000),
            monthly_limit: dec!(200_000_000),
            currency: Currency::NGN,
        };
        let json = serde_json::to_value(&limits).unwrap();
        assert_eq!(json["currency"], "NGN");
    }
}
