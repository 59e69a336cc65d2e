//! Provider registries
//!
//! Insertion-ordered lookup tables mapping lowercase provider names to
//! provider instances. The application's startup routine constructs a
//! registry, registers each provider once, and passes the registry by
//! reference (or behind an `Arc`) to whatever routes requests: there
//! is deliberately no global instance.
//!
//! Secondary lookups are linear scans over the registered providers.
//! Provider counts are single digits and lookups are nothing next to
//! the network I/O they precede, so no secondary maps are maintained.

use std::sync::Arc;
use tracing::info;

use railpay_types::{BankCodeType, Currency};

use crate::compliance::ComplianceProvider;
use crate::payment::PaymentProvider;

/// Registry of payment providers
#[derive(Default)]
pub struct PaymentProviderRegistry {
    providers: Vec<Arc<dyn PaymentProvider>>,
}

impl PaymentProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its lowercased name.
    ///
    /// Re-registering an existing name replaces the earlier provider in
    /// place (last write wins, registration order preserved): no error
    /// on duplicates, so tests can swap a mock in.
    pub fn register(&mut self, provider: Arc<dyn PaymentProvider>) {
        let name = provider.name().to_lowercase();
        info!(provider = %name, region = %provider.region(), "registering payment provider");
        match self
            .providers
            .iter_mut()
            .find(|p| p.name().to_lowercase() == name)
        {
            Some(slot) => *slot = provider,
            None => self.providers.push(provider),
        }
    }

    /// Get a provider by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<Arc<dyn PaymentProvider>> {
        let name = name.to_lowercase();
        self.providers
            .iter()
            .find(|p| p.name().to_lowercase() == name)
            .cloned()
    }

    /// First registered provider for a region
    pub fn for_region(&self, region: &str) -> Option<Arc<dyn PaymentProvider>> {
        self.providers
            .iter()
            .find(|p| p.region().eq_ignore_ascii_case(region))
            .cloned()
    }

    /// First registered provider supporting a currency
    pub fn for_currency(&self, currency: Currency) -> Option<Arc<dyn PaymentProvider>> {
        self.providers
            .iter()
            .find(|p| p.capabilities().supported_currencies.contains(&currency))
            .cloned()
    }

    /// Provider responsible for a bank code scheme.
    ///
    /// The scheme-to-provider mapping is fixed: each code type belongs
    /// to exactly one rail.
    pub fn for_bank_code_type(&self, code_type: BankCodeType) -> Option<Arc<dyn PaymentProvider>> {
        let name = match code_type {
            BankCodeType::Nibss => "nibss",
            BankCodeType::Routing => "ach",
            BankCodeType::Swift => "swift",
            BankCodeType::Transit => "interac",
            BankCodeType::SortCode => "faster-payments",
        };
        self.get(name)
    }

    /// All registered providers, in registration order
    pub fn all(&self) -> &[Arc<dyn PaymentProvider>] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Registry of compliance providers
#[derive(Default)]
pub struct ComplianceProviderRegistry {
    providers: Vec<Arc<dyn ComplianceProvider>>,
}

impl ComplianceProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its lowercased name; last write wins
    pub fn register(&mut self, provider: Arc<dyn ComplianceProvider>) {
        let name = provider.name().to_lowercase();
        info!(provider = %name, country = %provider.country(), "registering compliance provider");
        match self
            .providers
            .iter_mut()
            .find(|p| p.name().to_lowercase() == name)
        {
            Some(slot) => *slot = provider,
            None => self.providers.push(provider),
        }
    }

    /// Get a provider by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<Arc<dyn ComplianceProvider>> {
        let name = name.to_lowercase();
        self.providers
            .iter()
            .find(|p| p.name().to_lowercase() == name)
            .cloned()
    }

    /// First registered provider for a region
    pub fn for_region(&self, region: &str) -> Option<Arc<dyn ComplianceProvider>> {
        self.providers
            .iter()
            .find(|p| p.region().eq_ignore_ascii_case(region))
            .cloned()
    }

    /// First registered provider for a country code
    pub fn for_country(&self, country: &str) -> Option<Arc<dyn ComplianceProvider>> {
        self.providers
            .iter()
            .find(|p| p.country().eq_ignore_ascii_case(country))
            .cloned()
    }

    /// All registered providers, in registration order
    pub fn all(&self) -> &[Arc<dyn ComplianceProvider>] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use railpay_types::{
        AccountValidationRequest, AccountValidationResult, Bank, BankListRequest,
        ProviderCapabilities, ProviderOperation, RailPayError, Result, TransferLimits,
        TransferRequest, TransferResponse, TransferStatusRequest, TransferStatusResponse,
        TransferType,
    };

    use crate::core::{default_is_supported, ProviderCore};

    struct StubProvider {
        core: ProviderCore,
        name: &'static str,
        region: &'static str,
        capabilities: ProviderCapabilities,
    }

    impl StubProvider {
        fn new(name: &'static str, region: &'static str, currencies: Vec<Currency>) -> Arc<Self> {
            Arc::new(Self {
                core: ProviderCore::new(name),
                name,
                region,
                capabilities: ProviderCapabilities {
                    supports_account_validation: true,
                    supports_instant_transfer: true,
                    supports_scheduled_transfer: false,
                    supports_international_transfer: false,
                    supported_currencies: currencies,
                    supported_countries: vec![],
                    average_processing_time: "instant".into(),
                },
            })
        }
    }

    #[async_trait]
    impl PaymentProvider for StubProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn region(&self) -> &str {
            self.region
        }

        fn capabilities(&self) -> &ProviderCapabilities {
            &self.capabilities
        }

        async fn initialize(&self, config: serde_json::Value) -> Result<()> {
            self.core.initialize(config).await;
            Ok(())
        }

        fn is_supported(&self, operation: ProviderOperation) -> bool {
            default_is_supported(&self.capabilities, operation)
        }

        async fn validate_account(
            &self,
            _request: &AccountValidationRequest,
        ) -> Result<AccountValidationResult> {
            self.core.ensure_initialized().await?;
            Ok(AccountValidationResult::valid("STUB", "0000000000", "Stub"))
        }

        async fn transfer(&self, request: &TransferRequest) -> Result<TransferResponse> {
            self.core.ensure_initialized().await?;
            Ok(TransferResponse::failed(
                request.reference.clone(),
                "STUB",
                "stub provider",
            ))
        }

        async fn status(&self, _request: &TransferStatusRequest) -> Result<TransferStatusResponse> {
            self.core.ensure_initialized().await?;
            Err(RailPayError::config("stub"))
        }

        async fn bank_list(&self, _request: &BankListRequest) -> Result<Vec<Bank>> {
            self.core.ensure_initialized().await?;
            Ok(vec![])
        }

        async fn transfer_limits(&self, _currency: Currency) -> Result<TransferLimits> {
            self.core.ensure_initialized().await?;
            Err(RailPayError::config("stub"))
        }

        async fn calculate_fee(
            &self,
            _amount: Decimal,
            _currency: Currency,
            _transfer_type: TransferType,
        ) -> Result<Decimal> {
            self.core.ensure_initialized().await?;
            Ok(Decimal::ZERO)
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = PaymentProviderRegistry::new();
        registry.register(StubProvider::new("NIBSS", "Nigeria", vec![Currency::NGN]));

        assert_eq!(registry.len(), 1);
        assert!(registry.get("nibss").is_some());
        assert!(registry.get("NIBSS").is_some());
        assert!(registry.get("sepa").is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let mut registry = PaymentProviderRegistry::new();
        let first = StubProvider::new("nibss", "Nigeria", vec![Currency::NGN]);
        let second = StubProvider::new("nibss", "Nigeria", vec![Currency::NGN]);
        let second_dyn: Arc<dyn PaymentProvider> = second.clone();

        registry.register(first);
        registry.register(second);

        assert_eq!(registry.len(), 1);
        let resolved = registry.get("nibss").unwrap();
        assert!(Arc::ptr_eq(&resolved, &second_dyn));
    }

    #[test]
    fn test_lookup_by_currency_and_region() {
        let mut registry = PaymentProviderRegistry::new();
        registry.register(StubProvider::new("nibss", "Nigeria", vec![Currency::NGN]));
        registry.register(StubProvider::new("interac", "Canada", vec![Currency::CAD]));

        assert_eq!(
            registry.for_currency(Currency::NGN).unwrap().name(),
            "nibss"
        );
        assert_eq!(
            registry.for_currency(Currency::CAD).unwrap().name(),
            "interac"
        );
        assert!(registry.for_currency(Currency::USD).is_none());

        assert_eq!(registry.for_region("nigeria").unwrap().name(), "nibss");
        assert!(registry.for_region("Mars").is_none());
    }

    #[test]
    fn test_lookup_by_bank_code_type() {
        let mut registry = PaymentProviderRegistry::new();
        registry.register(StubProvider::new("nibss", "Nigeria", vec![Currency::NGN]));

        assert_eq!(
            registry
                .for_bank_code_type(BankCodeType::Nibss)
                .unwrap()
                .name(),
            "nibss"
        );
        assert!(registry.for_bank_code_type(BankCodeType::Routing).is_none());
    }

    #[tokio::test]
    async fn test_operations_require_initialize() {
        let provider = StubProvider::new("nibss", "Nigeria", vec![Currency::NGN]);
        let request = AccountValidationRequest {
            account_number: "0123456789".into(),
            bank_code: "058".into(),
            bank_code_type: BankCodeType::Nibss,
            currency: None,
            region: None,
        };

        let err = provider.validate_account(&request).await.unwrap_err();
        assert_eq!(err.error_code(), "PROVIDER_NOT_INITIALIZED");

        provider.initialize(serde_json::json!({})).await.unwrap();
        assert!(provider.validate_account(&request).await.is_ok());
    }
}
