//! RailPay Gateway - startup wiring for the payment core
//!
//! The application's startup routine calls [`Gateway::bootstrap`] once
//! with injected configuration and receives the provider registries
//! plus the transfer-reference generator. Nothing here is a global:
//! the returned [`Gateway`] is passed (usually behind an `Arc`) to the
//! route layer.
//!
//! The mock rail is selected only by the explicit `use_mock` flag and
//! is refused outright in production. A misconfigured real provider
//! fails the bootstrap loudly: it is never silently replaced with
//! mock data.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use railpay_compliance::{NigeriaComplianceConfig, NigeriaComplianceProvider};
use railpay_mock::MockProvider;
use railpay_nibss::{NibssConfig, NibssProvider};
use railpay_providers::{
    ComplianceProvider, ComplianceProviderRegistry, PaymentProvider, PaymentProviderRegistry,
};
use railpay_reference::{ReferenceGenerator, DEFAULT_BANK_CODE};
use railpay_types::{RailPayError, Result};

/// Transfer-reference generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// HMAC secret binding references to this deployment. Required.
    pub secret: String,
    /// 2-3 character bank code prefix for references
    pub default_bank_code: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            default_bank_code: DEFAULT_BANK_CODE.to_string(),
        }
    }
}

/// Everything the payment core needs at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Use the deterministic mock rail instead of NIBSS. Development
    /// only; refused when the NIBSS environment is production.
    pub use_mock: bool,
    pub nibss: NibssConfig,
    pub compliance: NigeriaComplianceConfig,
    pub reference: ReferenceConfig,
}

impl GatewayConfig {
    /// Read configuration from the process environment.
    /// Startup-routine use only.
    pub fn from_env() -> Self {
        Self {
            use_mock: std::env::var("RAILPAY_USE_MOCK")
                .map(|v| v == "true")
                .unwrap_or(false),
            nibss: NibssConfig::from_env(),
            compliance: NigeriaComplianceConfig::default(),
            reference: ReferenceConfig {
                secret: std::env::var("RAILPAY_TRANSFER_REF_SECRET").unwrap_or_default(),
                default_bank_code: std::env::var("RAILPAY_BANK_CODE")
                    .unwrap_or_else(|_| DEFAULT_BANK_CODE.to_string()),
            },
        }
    }
}

/// The wired payment core: registries plus the reference generator
pub struct Gateway {
    payments: PaymentProviderRegistry,
    compliance: ComplianceProviderRegistry,
    references: ReferenceGenerator,
}

impl Gateway {
    /// Construct, initialize, and register every provider.
    ///
    /// Fails loudly on any misconfiguration; a half-wired gateway is
    /// never returned.
    pub async fn bootstrap(config: GatewayConfig) -> Result<Self> {
        if config.reference.secret.is_empty() {
            return Err(RailPayError::config(
                "transfer reference secret is not set",
            ));
        }
        let references = ReferenceGenerator::new(
            config.reference.secret.as_bytes(),
            config.reference.default_bank_code.clone(),
        );

        let mut payments = PaymentProviderRegistry::new();
        if config.use_mock {
            if config.nibss.environment.is_production() {
                return Err(RailPayError::config(
                    "mock rail cannot be enabled in production",
                ));
            }
            warn!("mock rail enabled; no real transfers will occur");
            let mock = Arc::new(MockProvider::new());
            mock.initialize(serde_json::json!({})).await?;
            payments.register(mock);
        } else {
            let nibss = Arc::new(NibssProvider::new());
            let nibss_config = serde_json::to_value(&config.nibss)
                .map_err(|e| RailPayError::config(e.to_string()))?;
            nibss.initialize(nibss_config).await?;
            payments.register(nibss);
        }

        let mut compliance = ComplianceProviderRegistry::new();
        let nigeria = Arc::new(NigeriaComplianceProvider::new());
        let compliance_config = serde_json::to_value(&config.compliance)
            .map_err(|e| RailPayError::config(e.to_string()))?;
        nigeria.initialize(compliance_config).await?;
        compliance.register(nigeria);

        info!(
            payment_providers = payments.len(),
            compliance_providers = compliance.len(),
            "payment gateway bootstrapped"
        );

        Ok(Self {
            payments,
            compliance,
            references,
        })
    }

    pub fn payments(&self) -> &PaymentProviderRegistry {
        &self.payments
    }

    pub fn compliance(&self) -> &ComplianceProviderRegistry {
        &self.compliance
    }

    pub fn references(&self) -> &ReferenceGenerator {
        &self.references
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("payments", &self.payments.len())
            .field("compliance", &self.compliance.len())
            .finish()
    }
}
