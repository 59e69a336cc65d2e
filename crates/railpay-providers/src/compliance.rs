//! The compliance provider contract
//!
//! One implementation per jurisdiction. The KYC requirement is a pure
//! function of the jurisdiction's regulatory limits, so route handlers
//! can gate transfers without a network round trip.

use async_trait::async_trait;
use rust_decimal::Decimal;

use railpay_types::{
    ComplianceCapabilities, ComplianceOperation, Currency, KycLevel, RegulatoryLimits, Result,
    SanctionsScreenResult,
};

/// Trait for regional compliance providers.
///
/// Same lifecycle as [`PaymentProvider`](crate::PaymentProvider):
/// initialized once at startup, every other operation fails with
/// `UninitializedProviderError` before that.
#[async_trait]
pub trait ComplianceProvider: Send + Sync {
    /// Unique lowercase registry name, e.g. `"nigeria"`
    fn name(&self) -> &str;

    fn region(&self) -> &str;

    /// ISO 3166-1 alpha-2 country code
    fn country(&self) -> &str;

    fn capabilities(&self) -> &ComplianceCapabilities;

    /// Store configuration and make the provider operational
    async fn initialize(&self, config: serde_json::Value) -> Result<()>;

    /// Whether an operation of this size is permitted at all under the
    /// jurisdiction's regulations
    async fn is_compliant(
        &self,
        operation: ComplianceOperation,
        amount: Decimal,
        currency: Currency,
    ) -> Result<bool>;

    /// The verification tier a customer needs before this operation.
    /// Pure function of the regulatory limits; implementations usually
    /// delegate to [`tiered_kyc_level`](crate::tiered_kyc_level).
    async fn required_kyc_level(
        &self,
        operation: ComplianceOperation,
        amount: Decimal,
        currency: Currency,
    ) -> Result<KycLevel>;

    /// Regulatory thresholds for the jurisdiction
    async fn regulatory_limits(&self, currency: Currency) -> Result<RegulatoryLimits>;

    /// Screen a counterparty name against the designated lists
    async fn screen_sanctions(&self, name: &str) -> Result<SanctionsScreenResult>;
}
