//! The payment provider contract
//!
//! One implementation per regional rail (NIBSS today; the trait is
//! shaped to also fit ACH, SEPA, Interac, and SWIFT) plus the
//! deterministic mock used in development.

use async_trait::async_trait;
use rust_decimal::Decimal;

use railpay_types::{
    AccountValidationRequest, AccountValidationResult, Bank, BankListRequest, Currency,
    ProviderCapabilities, ProviderOperation, Result, TransferLimits, TransferRequest,
    TransferResponse, TransferStatusRequest, TransferStatusResponse, TransferType,
};

/// Trait for payment providers.
///
/// Every operation except [`initialize`](Self::initialize) fails with
/// `UninitializedProviderError` until `initialize` has run.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Unique lowercase registry name, e.g. `"nibss"`
    fn name(&self) -> &str;

    /// Routing region, e.g. `"Nigeria"`
    fn region(&self) -> &str;

    /// What this provider can do
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Store tenant/environment configuration and make the provider
    /// operational. Idempotent-safe; callers should call once.
    async fn initialize(&self, config: serde_json::Value) -> Result<()>;

    /// Whether this provider supports an operation. Implementations
    /// usually delegate to [`default_is_supported`](crate::default_is_supported).
    fn is_supported(&self, operation: ProviderOperation) -> bool;

    /// Resolve an account number to its holder's name (name enquiry)
    async fn validate_account(
        &self,
        request: &AccountValidationRequest,
    ) -> Result<AccountValidationResult>;

    /// Initiate a fund transfer.
    ///
    /// Must be idempotent under `request.reference`: replaying the same
    /// reference returns the original outcome rather than moving funds
    /// twice. Each implementation enforces or documents this against
    /// its rail's actual duplicate-reference behavior.
    async fn transfer(&self, request: &TransferRequest) -> Result<TransferResponse>;

    /// Look up the state of a previously initiated transfer
    async fn status(&self, request: &TransferStatusRequest) -> Result<TransferStatusResponse>;

    /// Banks reachable through this provider
    async fn bank_list(&self, request: &BankListRequest) -> Result<Vec<Bank>>;

    /// Provider transfer limits for a currency
    async fn transfer_limits(&self, currency: Currency) -> Result<TransferLimits>;

    /// Fee charged for a transfer of `amount`
    async fn calculate_fee(
        &self,
        amount: Decimal,
        currency: Currency,
        transfer_type: TransferType,
    ) -> Result<Decimal>;
}
