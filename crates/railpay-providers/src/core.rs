//! Shared provider state and default behavior
//!
//! Concrete providers own a [`ProviderCore`] and delegate to it
//! explicitly instead of inheriting from a base class. It tracks the
//! opaque configuration blob and the initialized flag, and enforces the
//! one lifecycle invariant every provider shares: no operation before
//! `initialize`.

use rust_decimal::Decimal;
use tokio::sync::RwLock;

use railpay_types::{
    KycLevel, ProviderCapabilities, ProviderOperation, RailPayError, RegulatoryLimits, Result,
};

#[derive(Debug, Default)]
struct CoreState {
    config: Option<serde_json::Value>,
    initialized: bool,
}

/// Config/initialization state owned by every concrete provider
#[derive(Debug)]
pub struct ProviderCore {
    name: String,
    state: RwLock<CoreState>,
}

impl ProviderCore {
    /// Create the core for a provider with the given registry name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(CoreState::default()),
        }
    }

    /// Store the configuration blob and mark the provider initialized.
    ///
    /// Safe to call again (the config is overwritten), though callers
    /// are expected to initialize once at startup.
    pub async fn initialize(&self, config: serde_json::Value) {
        let mut state = self.state.write().await;
        state.config = Some(config);
        state.initialized = true;
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.initialized
    }

    /// Fail with `UninitializedProviderError` unless `initialize` ran
    pub async fn ensure_initialized(&self) -> Result<()> {
        if self.state.read().await.initialized {
            Ok(())
        } else {
            Err(RailPayError::uninitialized(&self.name))
        }
    }

    /// The configuration blob passed to `initialize`, if any
    pub async fn config(&self) -> Option<serde_json::Value> {
        self.state.read().await.config.clone()
    }
}

/// Default operation support: `transfer`, `status`, and `banks` are
/// mandatory for every payment provider; `validate` depends on the
/// provider's capabilities.
pub fn default_is_supported(
    capabilities: &ProviderCapabilities,
    operation: ProviderOperation,
) -> bool {
    match operation {
        ProviderOperation::Validate => capabilities.supports_account_validation,
        ProviderOperation::Transfer | ProviderOperation::Status | ProviderOperation::Banks => true,
    }
}

/// Default tiered KYC requirement: a pure function of the regulatory
/// limits. At or above the EDD threshold the operation needs advanced
/// verification; at half the suspicious-activity threshold,
/// intermediate; otherwise basic.
pub fn tiered_kyc_level(limits: &RegulatoryLimits, amount: Decimal) -> KycLevel {
    if amount >= limits.enhanced_due_diligence_threshold {
        KycLevel::Advanced
    } else if amount >= limits.suspicious_activity_threshold / Decimal::TWO {
        KycLevel::Intermediate
    } else {
        KycLevel::Basic
    }
}
