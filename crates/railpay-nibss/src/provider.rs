//! NIBSS payment provider
//!
//! NIP (NIBSS Instant Payment) implementation of the
//! [`PaymentProvider`] contract: account name enquiry, funds transfer,
//! status, the Nigerian bank table, and CBN fee/limit schedules.
//!
//! NIP dedupes on `TransactionReference`, which is what makes
//! `transfer` idempotent under the caller-supplied reference: replaying
//! a reference returns the rail's original response code rather than
//! moving funds again. The duplicate-reference response is forwarded
//! untouched.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Method;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use sha2::Sha512;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use railpay_providers::{default_is_supported, PaymentProvider, ProviderCore};
use railpay_types::{
    AccountValidationRequest, AccountValidationResult, Bank, BankCodeType, BankListRequest,
    Currency, ProviderCapabilities, ProviderOperation, RailPayError, Result, TransferLimits,
    TransferRequest, TransferResponse, TransferStatus, TransferStatusRequest,
    TransferStatusResponse, TransferType,
};

use crate::auth::NibssAuthService;
use crate::config::NibssConfig;

/// NIP channel code for web-originated requests
const WEB_CHANNEL_CODE: &str = "6";

/// NIP caps narration at 30 characters
const NARRATION_MAX_LEN: usize = 30;

/// NIP response code for success
const RESPONSE_OK: &str = "00";

#[derive(Clone)]
struct NibssRail {
    config: NibssConfig,
    auth: Arc<NibssAuthService>,
}

impl NibssRail {
    /// HMAC-SHA512 signature over the serialized NIP payload, sent in
    /// the `Signature` header alongside the OAuth bearer token
    fn payload_signature(&self, payload: &serde_json::Value) -> Result<String> {
        let body = serde_json::to_string(payload)
            .map_err(|e| RailPayError::validation("payload", e.to_string()))?;
        let mut mac = Hmac::<Sha512>::new_from_slice(self.config.client_secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(body.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn signature_headers(&self, payload: &serde_json::Value) -> Result<[(&'static str, String); 2]> {
        Ok([
            ("Signature", self.payload_signature(payload)?),
            ("SignatureMethod", "SHA512".to_string()),
        ])
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NameEnquiryWire {
    response_code: String,
    #[serde(default)]
    account_number: Option<String>,
    #[serde(default)]
    account_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TransferWire {
    response_code: String,
    #[serde(default)]
    response_description: Option<String>,
    #[serde(default, rename = "SessionID")]
    session_id: Option<String>,
}

/// The NIBSS rail as a [`PaymentProvider`]
pub struct NibssProvider {
    core: ProviderCore,
    capabilities: ProviderCapabilities,
    rail: RwLock<Option<NibssRail>>,
}

impl NibssProvider {
    pub fn new() -> Self {
        Self {
            core: ProviderCore::new("nibss"),
            capabilities: ProviderCapabilities {
                supports_account_validation: true,
                supports_instant_transfer: true,
                supports_scheduled_transfer: false,
                supports_international_transfer: false,
                supported_currencies: vec![Currency::NGN],
                supported_countries: vec!["NG".to_string()],
                average_processing_time: "instant".to_string(),
            },
            rail: RwLock::new(None),
        }
    }

    async fn rail(&self) -> Result<NibssRail> {
        self.core.ensure_initialized().await?;
        self.rail
            .read()
            .await
            .clone()
            .ok_or_else(|| RailPayError::uninitialized("nibss"))
    }

    fn bank_name(bank_code: &str) -> &'static str {
        NIGERIAN_BANKS
            .iter()
            .find(|(code, _, _)| *code == bank_code)
            .map(|(_, name, _)| *name)
            .unwrap_or("Unknown Bank")
    }
}

impl Default for NibssProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentProvider for NibssProvider {
    fn name(&self) -> &str {
        "nibss"
    }

    fn region(&self) -> &str {
        "Nigeria"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn initialize(&self, config: serde_json::Value) -> Result<()> {
        let parsed: NibssConfig = serde_json::from_value(config.clone())
            .map_err(|e| RailPayError::config(format!("invalid NIBSS config: {e}")))?;
        let auth = Arc::new(NibssAuthService::new(parsed.clone())?);

        *self.rail.write().await = Some(NibssRail {
            config: parsed,
            auth,
        });
        self.core.initialize(config).await;
        info!("NIBSS provider initialized");
        Ok(())
    }

    fn is_supported(&self, operation: ProviderOperation) -> bool {
        default_is_supported(&self.capabilities, operation)
    }

    /// NIBSS name enquiry
    async fn validate_account(
        &self,
        request: &AccountValidationRequest,
    ) -> Result<AccountValidationResult> {
        let rail = self.rail().await?;

        // NUBAN account numbers are exactly 10 digits
        if request.account_number.len() != 10
            || !request.account_number.chars().all(|c| c.is_ascii_digit())
        {
            return Ok(AccountValidationResult::invalid(
                "INVALID_LENGTH",
                "Nigerian account numbers must be 10 digits",
            ));
        }

        let payload = serde_json::json!({
            "AccountNumber": request.account_number,
            "DestinationInstitutionCode": request.bank_code,
            "ChannelCode": WEB_CHANNEL_CODE,
        });
        let headers = rail.signature_headers(&payload)?;
        let value = rail
            .auth
            .request_with_headers(Method::POST, "/nip/nameenquiry", Some(&payload), &headers)
            .await?;

        let wire: NameEnquiryWire = serde_json::from_value(value.clone()).map_err(|_| {
            RailPayError::Upstream {
                status: 200,
                body: value.to_string(),
            }
        })?;

        if wire.response_code == RESPONSE_OK {
            Ok(AccountValidationResult::valid(
                wire.account_name.unwrap_or_default(),
                wire.account_number
                    .unwrap_or_else(|| request.account_number.clone()),
                Self::bank_name(&request.bank_code),
            ))
        } else {
            Ok(AccountValidationResult::invalid(
                wire.response_code,
                "Account validation failed",
            ))
        }
    }

    /// NIP funds transfer
    async fn transfer(&self, request: &TransferRequest) -> Result<TransferResponse> {
        let rail = self.rail().await?;

        if request.currency != Currency::NGN {
            return Ok(TransferResponse::failed(
                request.reference.clone(),
                "INVALID_CURRENCY",
                "NIBSS only supports NGN transfers",
            ));
        }

        let fee = self
            .calculate_fee(request.amount, request.currency, request.transfer_type)
            .await?;
        let total_amount = request.amount + fee;
        let narration: String = request.narration.chars().take(NARRATION_MAX_LEN).collect();

        let payload = serde_json::json!({
            "FromAccount": request.from_account_number,
            "ToAccount": request.to_account_number,
            "Amount": request.amount,
            "Currency": request.currency.numeric_code(),
            "DestinationInstitutionCode": request.to_bank_code,
            "OriginatorInstitutionCode": request
                .from_bank_code
                .clone()
                .unwrap_or_else(|| rail.config.organization_code.clone()),
            "Narration": narration,
            "TransactionReference": request.reference,
            "BeneficiaryName": request.to_account_name,
            "OriginatorName": request.from_account_name,
            "ChannelCode": WEB_CHANNEL_CODE,
        });
        let headers = rail.signature_headers(&payload)?;

        let value = match rail
            .auth
            .request_with_headers(Method::POST, "/nip/fundsTransfer", Some(&payload), &headers)
            .await
        {
            Ok(value) => value,
            // The request may have reached the rail before the deadline
            // hit; the outcome is unknown, so the caller must poll
            // status with this reference rather than retry a fresh one
            Err(RailPayError::Timeout { .. }) => {
                warn!(reference = %request.reference, "NIP transfer timed out after send");
                return Err(RailPayError::UnknownOutcome {
                    reference: request.reference.clone(),
                });
            }
            Err(e) => return Err(e),
        };

        let wire: TransferWire =
            serde_json::from_value(value.clone()).map_err(|_| RailPayError::Upstream {
                status: 200,
                body: value.to_string(),
            })?;

        if wire.response_code == RESPONSE_OK {
            Ok(TransferResponse {
                success: true,
                transaction_reference: request.reference.clone(),
                provider_reference: wire.session_id,
                status: TransferStatus::Completed,
                message: Some("Transfer successful".to_string()),
                error_code: None,
                fee: Some(fee),
                total_amount: Some(total_amount),
                estimated_completion: None,
            })
        } else {
            Ok(TransferResponse {
                success: false,
                transaction_reference: request.reference.clone(),
                provider_reference: wire.session_id,
                status: TransferStatus::Failed,
                message: wire
                    .response_description
                    .or_else(|| Some("Transfer failed".to_string())),
                error_code: Some(wire.response_code),
                fee: None,
                total_amount: None,
                estimated_completion: None,
            })
        }
    }

    /// NIP determines outcomes at transfer time; there is no separate
    /// status API on the rail
    async fn status(&self, request: &TransferStatusRequest) -> Result<TransferStatusResponse> {
        self.core.ensure_initialized().await?;
        Ok(TransferStatusResponse {
            transaction_reference: request.transaction_reference.clone(),
            provider_reference: request.provider_reference.clone(),
            status: TransferStatus::Completed,
            amount: None,
            currency: None,
            completed_at: None,
            failure_reason: None,
            metadata: Some(serde_json::json!({
                "note": "NIP transfers are instant; status is determined at transfer time"
            })),
        })
    }

    async fn bank_list(&self, _request: &BankListRequest) -> Result<Vec<Bank>> {
        self.core.ensure_initialized().await?;
        Ok(NIGERIAN_BANKS
            .iter()
            .map(|(code, name, swift)| Bank {
                code: (*code).to_string(),
                name: (*name).to_string(),
                code_type: BankCodeType::Nibss,
                country: "NG".to_string(),
                currency: Some(Currency::NGN),
                swift_code: Some((*swift).to_string()),
                active: true,
            })
            .collect())
    }

    /// CBN-mandated NIP limits
    async fn transfer_limits(&self, currency: Currency) -> Result<TransferLimits> {
        self.core.ensure_initialized().await?;
        if currency != Currency::NGN {
            return Err(RailPayError::validation(
                "currency",
                format!("NIBSS only supports NGN, got {currency}"),
            ));
        }
        Ok(TransferLimits {
            min_amount: dec!(100),
            max_amount: dec!(10_000_000),
            daily_limit: dec!(50_000_000),
            monthly_limit: dec!(200_000_000),
            currency: Currency::NGN,
        })
    }

    /// CBN NIP fee schedule
    async fn calculate_fee(
        &self,
        amount: Decimal,
        currency: Currency,
        _transfer_type: TransferType,
    ) -> Result<Decimal> {
        self.core.ensure_initialized().await?;
        if currency != Currency::NGN {
            return Err(RailPayError::validation(
                "currency",
                format!("NIBSS only supports NGN, got {currency}"),
            ));
        }
        Ok(if amount <= dec!(5_000) {
            dec!(10.75)
        } else if amount <= dec!(50_000) {
            dec!(26.88)
        } else {
            dec!(53.75)
        })
    }
}

/// Static table of major Nigerian banks: (NIBSS code, name, SWIFT).
/// Production deployments refresh this from the rail's bank-list
/// endpoint.
const NIGERIAN_BANKS: &[(&str, &str, &str)] = &[
    ("044", "Access Bank", "ABNGNGLA"),
    ("011", "First Bank of Nigeria", "FBNINGLA"),
    ("214", "First City Monument Bank (FCMB)", "FCMBNGLA"),
    ("058", "Guaranty Trust Bank (GTBank)", "GTBINGLA"),
    ("221", "Stanbic IBTC Bank", "SBICNGLA"),
    ("232", "Sterling Bank", "NAMENGLA"),
    ("032", "Union Bank of Nigeria", "UBNINGLA"),
    ("033", "United Bank for Africa (UBA)", "UNAFNGLA"),
    ("035", "Wema Bank", "WEMANGLA"),
    ("057", "Zenith Bank", "ZEIBNGLA"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> serde_json::Value {
        serde_json::json!({
            // Nothing listens here; tests must not depend on a network
            "base_url": "http://127.0.0.1:9",
            "client_id": "test-client",
            "client_secret": "test-secret",
            "api_key": "test-api-key",
            "organization_code": "999999",
        })
    }

    async fn provider() -> NibssProvider {
        let provider = NibssProvider::new();
        provider.initialize(test_config()).await.unwrap();
        provider
    }

    fn transfer_request(currency: Currency) -> TransferRequest {
        TransferRequest {
            from_account_number: "0123456789".into(),
            from_account_name: "ADAEZE OBI".into(),
            from_bank_code: None,
            to_account_number: "9876543210".into(),
            to_account_name: Some("EMEKA NWOSU".into()),
            to_bank_code: "058".into(),
            to_bank_name: None,
            amount: dec!(25_000),
            currency,
            narration: "Rent".into(),
            reference: "FM01HXAMPLEREF0AAA0097".into(),
            transfer_type: TransferType::External,
            region: None,
            tenant_id: None,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn test_operations_require_initialize() {
        let provider = NibssProvider::new();
        let err = provider
            .transfer(&transfer_request(Currency::NGN))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "PROVIDER_NOT_INITIALIZED");
    }

    #[tokio::test]
    async fn test_initialize_rejects_missing_credentials() {
        let provider = NibssProvider::new();
        let err = provider
            .initialize(serde_json::json!({"base_url": "http://127.0.0.1:9"}))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_transfer_rejects_foreign_currency_without_network() {
        let provider = provider().await;
        let response = provider
            .transfer(&transfer_request(Currency::USD))
            .await
            .unwrap();
        assert!(!response.success);
        assert_eq!(response.error_code.as_deref(), Some("INVALID_CURRENCY"));
        assert_eq!(response.status, TransferStatus::Failed);
    }

    #[tokio::test]
    async fn test_transfer_surfaces_unreachable_rail() {
        let provider = provider().await;
        // The token exchange is the first network hop and must surface
        // a typed authentication error, never a panic or silent mock
        let err = provider
            .transfer(&transfer_request(Currency::NGN))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "AUTHENTICATION_FAILED");
    }

    #[tokio::test]
    async fn test_validate_account_length_precheck() {
        let provider = provider().await;
        let request = AccountValidationRequest {
            account_number: "12345".into(),
            bank_code: "058".into(),
            bank_code_type: BankCodeType::Nibss,
            currency: None,
            region: None,
        };
        let result = provider.validate_account(&request).await.unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.error_code.as_deref(), Some("INVALID_LENGTH"));
    }

    #[tokio::test]
    async fn test_fee_schedule_tiers() {
        let provider = provider().await;
        let fee = |amount| provider.calculate_fee(amount, Currency::NGN, TransferType::External);

        assert_eq!(fee(dec!(5_000)).await.unwrap(), dec!(10.75));
        assert_eq!(fee(dec!(5_001)).await.unwrap(), dec!(26.88));
        assert_eq!(fee(dec!(50_000)).await.unwrap(), dec!(26.88));
        assert_eq!(fee(dec!(50_001)).await.unwrap(), dec!(53.75));

        let err = provider
            .calculate_fee(dec!(100), Currency::USD, TransferType::External)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_transfer_limits() {
        let provider = provider().await;
        let limits = provider.transfer_limits(Currency::NGN).await.unwrap();
        assert_eq!(limits.max_amount, dec!(10_000_000));
        assert!(provider.transfer_limits(Currency::EUR).await.is_err());
    }

    #[tokio::test]
    async fn test_bank_list_is_nibss_coded() {
        let provider = provider().await;
        let banks = provider
            .bank_list(&BankListRequest::default())
            .await
            .unwrap();
        assert!(!banks.is_empty());
        assert!(banks
            .iter()
            .all(|b| b.code_type == BankCodeType::Nibss && b.country == "NG" && b.active));
        assert!(banks.iter().any(|b| b.name.contains("Zenith")));
    }

    #[tokio::test]
    async fn test_payload_signature_is_deterministic() {
        let provider = provider().await;
        let rail = provider.rail().await.unwrap();
        let payload = serde_json::json!({"AccountNumber": "0123456789"});

        let first = rail.payload_signature(&payload).unwrap();
        let second = rail.payload_signature(&payload).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 128); // SHA-512 hex
    }

    #[test]
    fn test_is_supported_defaults() {
        let provider = NibssProvider::new();
        assert!(provider.is_supported(ProviderOperation::Validate));
        assert!(provider.is_supported(ProviderOperation::Transfer));
        assert!(provider.is_supported(ProviderOperation::Status));
        assert!(provider.is_supported(ProviderOperation::Banks));
    }
}
