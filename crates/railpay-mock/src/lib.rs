//! RailPay Mock - deterministic stand-in for the NIBSS rail
//!
//! Used when network or compliance dependencies are unavailable in
//! development. Responses are deterministic and parameterless: a fixed
//! bank table, name-enquiry results keyed only by the request inputs,
//! and synthetic transfer/status records carrying freshly generated
//! references.
//!
//! The mock is selected only by the gateway's explicit `use_mock` flag.
//! It is never substituted for a misconfigured real provider: that
//! must fail loudly at bootstrap instead.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use railpay_providers::{default_is_supported, PaymentProvider, ProviderCore};
use railpay_reference::ReferenceGenerator;
use railpay_types::{
    AccountValidationRequest, AccountValidationResult, Bank, BankCodeType, BankListRequest,
    Currency, ProviderCapabilities, ProviderOperation, Result, TransferLimits, TransferRequest,
    TransferResponse, TransferStatus, TransferStatusRequest, TransferStatusResponse, TransferType,
};

/// Canned account-holder names; the enquiry inputs pick one
const ACCOUNT_NAMES: &[&str] = &[
    "JOHN DOE",
    "JANE SMITH",
    "AHMED IBRAHIM",
    "CHIOMA OKORO",
    "FATIMA ABDUL",
    "EMEKA NWANKWO",
    "AISHA MOHAMMED",
    "TUNDE ADEBAYO",
];

/// Fixed Nigerian bank table served by the mock
const MOCK_BANKS: &[(&str, &str)] = &[
    ("044", "Access Bank"),
    ("023", "Citibank Nigeria Limited"),
    ("050", "Ecobank Nigeria Plc"),
    ("070", "Fidelity Bank"),
    ("011", "First Bank of Nigeria"),
    ("214", "First City Monument Bank"),
    ("058", "Guaranty Trust Bank"),
    ("082", "Keystone Bank"),
    ("076", "Polaris Bank"),
    ("221", "Stanbic IBTC Bank"),
    ("068", "Standard Chartered Bank Nigeria Ltd."),
    ("232", "Sterling Bank"),
    ("032", "Union Bank of Nigeria"),
    ("033", "United Bank For Africa"),
    ("215", "Unity Bank"),
    ("035", "Wema Bank"),
    ("057", "Zenith Bank"),
];

/// Deterministic mock payment provider
pub struct MockProvider {
    core: ProviderCore,
    capabilities: ProviderCapabilities,
    references: ReferenceGenerator,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            core: ProviderCore::new("mock"),
            capabilities: ProviderCapabilities {
                supports_account_validation: true,
                supports_instant_transfer: true,
                supports_scheduled_transfer: false,
                supports_international_transfer: false,
                supported_currencies: vec![Currency::NGN],
                supported_countries: vec!["NG".to_string()],
                average_processing_time: "instant".to_string(),
            },
            references: ReferenceGenerator::new("mock-rail-reference-secret", "MK"),
        }
    }

    /// Stable index into the canned data for a pair of inputs
    fn pick(account_number: &str, bank_code: &str, modulus: usize) -> usize {
        let sum: usize = account_number
            .bytes()
            .chain(bank_code.bytes())
            .map(usize::from)
            .sum();
        sum % modulus
    }

    fn bank_name(bank_code: &str) -> &'static str {
        MOCK_BANKS
            .iter()
            .find(|(code, _)| *code == bank_code)
            .map(|(_, name)| *name)
            .unwrap_or("Unknown Bank")
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn region(&self) -> &str {
        "Nigeria"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn initialize(&self, config: serde_json::Value) -> Result<()> {
        self.core.initialize(config).await;
        debug!("mock rail initialized");
        Ok(())
    }

    fn is_supported(&self, operation: ProviderOperation) -> bool {
        default_is_supported(&self.capabilities, operation)
    }

    /// Canned name enquiry keyed only by the request inputs
    async fn validate_account(
        &self,
        request: &AccountValidationRequest,
    ) -> Result<AccountValidationResult> {
        self.core.ensure_initialized().await?;

        if request.account_number.len() != 10
            || !request.account_number.chars().all(|c| c.is_ascii_digit())
        {
            return Ok(AccountValidationResult::invalid(
                "INVALID_LENGTH",
                "Nigerian account numbers must be 10 digits",
            ));
        }

        let name = ACCOUNT_NAMES
            [Self::pick(&request.account_number, &request.bank_code, ACCOUNT_NAMES.len())];
        Ok(AccountValidationResult::valid(
            name,
            request.account_number.clone(),
            Self::bank_name(&request.bank_code),
        ))
    }

    /// Synthetic transfer record with a freshly generated session
    /// reference. The mock holds no state, so replaying a reference
    /// yields an equivalent record: funds cannot move twice because
    /// none move at all.
    async fn transfer(&self, request: &TransferRequest) -> Result<TransferResponse> {
        self.core.ensure_initialized().await?;

        if request.currency != Currency::NGN {
            return Ok(TransferResponse::failed(
                request.reference.clone(),
                "INVALID_CURRENCY",
                "mock rail only supports NGN transfers",
            ));
        }

        let fee = self
            .calculate_fee(request.amount, request.currency, request.transfer_type)
            .await?;

        Ok(TransferResponse {
            success: true,
            transaction_reference: request.reference.clone(),
            provider_reference: Some(self.references.generate()),
            status: TransferStatus::Completed,
            message: Some("Transaction completed successfully".to_string()),
            error_code: None,
            fee: Some(fee),
            total_amount: Some(request.amount + fee),
            estimated_completion: None,
        })
    }

    async fn status(&self, request: &TransferStatusRequest) -> Result<TransferStatusResponse> {
        self.core.ensure_initialized().await?;
        Ok(TransferStatusResponse {
            transaction_reference: request.transaction_reference.clone(),
            provider_reference: request.provider_reference.clone(),
            status: TransferStatus::Completed,
            amount: None,
            currency: Some(Currency::NGN),
            completed_at: Some(Utc::now()),
            failure_reason: None,
            metadata: Some(serde_json::json!({"mock": true})),
        })
    }

    async fn bank_list(&self, _request: &BankListRequest) -> Result<Vec<Bank>> {
        self.core.ensure_initialized().await?;
        Ok(MOCK_BANKS
            .iter()
            .map(|(code, name)| Bank {
                code: (*code).to_string(),
                name: (*name).to_string(),
                code_type: BankCodeType::Nibss,
                country: "NG".to_string(),
                currency: Some(Currency::NGN),
                swift_code: None,
                active: true,
            })
            .collect())
    }

    async fn transfer_limits(&self, currency: Currency) -> Result<TransferLimits> {
        self.core.ensure_initialized().await?;
        Ok(TransferLimits {
            min_amount: dec!(100),
            max_amount: dec!(10_000_000),
            daily_limit: dec!(50_000_000),
            monthly_limit: dec!(200_000_000),
            currency,
        })
    }

    /// Mirrors the CBN NIP fee schedule so fee-sensitive flows behave
    /// the same against the mock as against the real rail
    async fn calculate_fee(
        &self,
        amount: Decimal,
        _currency: Currency,
        _transfer_type: TransferType,
    ) -> Result<Decimal> {
        self.core.ensure_initialized().await?;
        Ok(if amount <= dec!(5_000) {
            dec!(10.75)
        } else if amount <= dec!(50_000) {
            dec!(26.88)
        } else {
            dec!(53.75)
        })
    }
}
