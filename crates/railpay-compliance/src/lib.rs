//! RailPay Compliance - Regional regulatory compliance providers
//!
//! Currently one jurisdiction: Nigeria under CBN/NFIU rules. The
//! provider answers three questions route handlers ask before moving
//! money:
//!
//! - Is an operation of this size permitted at all?
//! - What KYC tier must the customer hold first?
//! - Does the counterparty name hit a designated-entities list?
//!
//! All answers are computed locally from the configured thresholds and
//! the static designated list: no network dependency on the hot path.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

use railpay_providers::{tiered_kyc_level, ComplianceProvider, ProviderCore};
use railpay_types::{
    ComplianceCapabilities, ComplianceOperation, Currency, KycLevel, RailPayError,
    RegulatoryLimits, Result, RiskLevel, SanctionedEntityType, SanctionsMatch,
    SanctionsScreenResult,
};

/// Designated entity carried in the static screening list
struct DesignatedEntity {
    name: &'static str,
    entity_type: SanctionedEntityType,
    list_name: &'static str,
    program: &'static str,
    /// Minimum match score (0-100) to report a hit
    match_threshold: u8,
}

/// Static designated-entities list used for screening. A production
/// deployment refreshes this from the regulator's feed; the screening
/// logic is identical.
const DESIGNATED_ENTITIES: &[DesignatedEntity] = &[
    DesignatedEntity {
        name: "Al-Qaeda",
        entity_type: SanctionedEntityType::Entity,
        list_name: "UN",
        program: "SDGT",
        match_threshold: 85,
    },
    DesignatedEntity {
        name: "Boko Haram",
        entity_type: SanctionedEntityType::Entity,
        list_name: "NFIU",
        program: "SDGT",
        match_threshold: 85,
    },
    DesignatedEntity {
        name: "Islamic State West Africa Province",
        entity_type: SanctionedEntityType::Entity,
        list_name: "UN",
        program: "SDGT",
        match_threshold: 80,
    },
    DesignatedEntity {
        name: "Ansaru",
        entity_type: SanctionedEntityType::Entity,
        list_name: "NFIU",
        program: "SDGT",
        match_threshold: 90,
    },
];

/// Thresholds for the Nigerian jurisdiction, overridable per tenant.
///
/// Defaults follow CBN/NFIU figures: individual cash-transaction
/// reporting at 5M NGN, suspicious-transaction reporting at 1M NGN,
/// enhanced due diligence from 10M NGN, and the NIP single-transaction
/// cap of 10M NGN.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NigeriaComplianceConfig {
    pub cash_reporting_threshold: Decimal,
    pub suspicious_activity_threshold: Decimal,
    pub enhanced_due_diligence_threshold: Decimal,
    pub single_transaction_limit: Decimal,
    pub daily_transaction_limit: Decimal,
    pub monthly_transaction_limit: Decimal,
}

impl Default for NigeriaComplianceConfig {
    fn default() -> Self {
        Self {
            cash_reporting_threshold: dec!(5_000_000),
            suspicious_activity_threshold: dec!(1_000_000),
            enhanced_due_diligence_threshold: dec!(10_000_000),
            single_transaction_limit: dec!(10_000_000),
            daily_transaction_limit: dec!(50_000_000),
            monthly_transaction_limit: dec!(200_000_000),
        }
    }
}

/// Nigeria (CBN) compliance provider
pub struct NigeriaComplianceProvider {
    core: ProviderCore,
    capabilities: ComplianceCapabilities,
    config: RwLock<NigeriaComplianceConfig>,
}

impl NigeriaComplianceProvider {
    pub fn new() -> Self {
        Self {
            core: ProviderCore::new("nigeria"),
            capabilities: ComplianceCapabilities {
                supports_kyc: true,
                supports_aml: true,
                supports_sanctions_screening: true,
                supports_pep_screening: true,
                regulatory_bodies: vec!["CBN".into(), "NFIU".into()],
            },
            config: RwLock::new(NigeriaComplianceConfig::default()),
        }
    }

    fn limits_from(config: &NigeriaComplianceConfig) -> RegulatoryLimits {
        RegulatoryLimits {
            single_transaction_limit: Some(config.single_transaction_limit),
            daily_transaction_limit: Some(config.daily_transaction_limit),
            monthly_transaction_limit: Some(config.monthly_transaction_limit),
            cash_reporting_threshold: config.cash_reporting_threshold,
            suspicious_activity_threshold: config.suspicious_activity_threshold,
            enhanced_due_diligence_threshold: config.enhanced_due_diligence_threshold,
            currency: Currency::NGN,
        }
    }
}

impl Default for NigeriaComplianceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComplianceProvider for NigeriaComplianceProvider {
    fn name(&self) -> &str {
        "nigeria"
    }

    fn region(&self) -> &str {
        "Nigeria"
    }

    fn country(&self) -> &str {
        "NG"
    }

    fn capabilities(&self) -> &ComplianceCapabilities {
        &self.capabilities
    }

    async fn initialize(&self, config: serde_json::Value) -> Result<()> {
        let parsed: NigeriaComplianceConfig =
            serde_json::from_value(config.clone()).map_err(|e| {
                RailPayError::config(format!("invalid nigeria compliance config: {e}"))
            })?;
        *self.config.write().await = parsed;
        self.core.initialize(config).await;
        Ok(())
    }

    async fn is_compliant(
        &self,
        _operation: ComplianceOperation,
        amount: Decimal,
        currency: Currency,
    ) -> Result<bool> {
        self.core.ensure_initialized().await?;
        if currency != Currency::NGN {
            return Ok(false);
        }
        let config = self.config.read().await;
        Ok(amount > Decimal::ZERO && amount <= config.single_transaction_limit)
    }

    async fn required_kyc_level(
        &self,
        _operation: ComplianceOperation,
        amount: Decimal,
        currency: Currency,
    ) -> Result<KycLevel> {
        self.core.ensure_initialized().await?;
        let limits = self.regulatory_limits(currency).await?;
        Ok(tiered_kyc_level(&limits, amount))
    }

    async fn regulatory_limits(&self, currency: Currency) -> Result<RegulatoryLimits> {
        self.core.ensure_initialized().await?;
        if currency != Currency::NGN {
            return Err(RailPayError::validation(
                "currency",
                format!("nigeria compliance only covers NGN, got {currency}"),
            ));
        }
        Ok(Self::limits_from(&*self.config.read().await))
    }

    async fn screen_sanctions(&self, name: &str) -> Result<SanctionsScreenResult> {
        self.core.ensure_initialized().await?;

        let matches: Vec<SanctionsMatch> = DESIGNATED_ENTITIES
            .iter()
            .filter_map(|entity| {
                let score = match_score(name, entity.name);
                if score >= entity.match_threshold {
                    Some(SanctionsMatch {
                        list_name: entity.list_name.to_string(),
                        entity_name: entity.name.to_string(),
                        entity_type: entity.entity_type,
                        program: entity.program.to_string(),
                        match_score: score,
                    })
                } else {
                    None
                }
            })
            .collect();

        if matches.is_empty() {
            return Ok(SanctionsScreenResult::clear());
        }

        let top_score = matches.iter().map(|m| m.match_score).max().unwrap_or(0);
        warn!(name = %name, hits = matches.len(), top_score, "sanctions screening hit");
        Ok(SanctionsScreenResult {
            matched: true,
            risk_level: if top_score >= 90 {
                RiskLevel::Critical
            } else {
                RiskLevel::High
            },
            requires_review: true,
            matches,
        })
    }
}

/// Token-overlap match score (0-100): the share of the entity's name
/// tokens present in the screened name. Crude but deterministic; the
/// thresholds in the list are tuned for it.
fn match_score(candidate: &str, entity: &str) -> u8 {
    let candidate_tokens: Vec<String> = tokenize(candidate);
    let entity_tokens: Vec<String> = tokenize(entity);
    if entity_tokens.is_empty() || candidate_tokens.is_empty() {
        return 0;
    }

    let hits = entity_tokens
        .iter()
        .filter(|t| candidate_tokens.contains(t))
        .count();
    ((hits * 100) / entity_tokens.len()) as u8
}

fn tokenize(name: &str) -> Vec<String> {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn provider() -> NigeriaComplianceProvider {
        let provider = NigeriaComplianceProvider::new();
        provider.initialize(serde_json::json!({})).await.unwrap();
        provider
    }

    #[tokio::test]
    async fn test_requires_initialize() {
        let provider = NigeriaComplianceProvider::new();
        let err = provider
            .regulatory_limits(Currency::NGN)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "PROVIDER_NOT_INITIALIZED");
    }

    #[tokio::test]
    async fn test_kyc_tiers() {
        let provider = provider().await;

        for (amount, expected) in [
            // Below half the STR threshold
            (dec!(400_000), KycLevel::Basic),
            (dec!(500_000), KycLevel::Intermediate),
            (dec!(9_999_999), KycLevel::Intermediate),
            (dec!(10_000_000), KycLevel::Advanced),
        ] {
            let level = provider
                .required_kyc_level(ComplianceOperation::Transfer, amount, Currency::NGN)
                .await
                .unwrap();
            assert_eq!(level, expected, "amount {amount}");
        }
    }

    #[tokio::test]
    async fn test_is_compliant_bounds() {
        let provider = provider().await;
        assert!(provider
            .is_compliant(ComplianceOperation::Transfer, dec!(50_000), Currency::NGN)
            .await
            .unwrap());
        // Above the single-transaction cap
        assert!(!provider
            .is_compliant(
                ComplianceOperation::Transfer,
                dec!(10_000_001),
                Currency::NGN
            )
            .await
            .unwrap());
        // Wrong currency for the jurisdiction
        assert!(!provider
            .is_compliant(ComplianceOperation::Transfer, dec!(50_000), Currency::USD)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_limits_only_cover_ngn() {
        let provider = provider().await;
        let err = provider.regulatory_limits(Currency::EUR).await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_config_override() {
        let provider = NigeriaComplianceProvider::new();
        provider
            .initialize(serde_json::json!({
                "enhanced_due_diligence_threshold": "2000000"
            }))
            .await
            .unwrap();

        let level = provider
            .required_kyc_level(
                ComplianceOperation::Transfer,
                dec!(2_000_000),
                Currency::NGN,
            )
            .await
            .unwrap();
        assert_eq!(level, KycLevel::Advanced);
    }

    #[tokio::test]
    async fn test_sanctions_screening() {
        let provider = provider().await;

        let clean = provider.screen_sanctions("Adaeze Obi").await.unwrap();
        assert!(!clean.matched);
        assert_eq!(clean.risk_level, RiskLevel::Low);

        let hit = provider
            .screen_sanctions("boko haram logistics ltd")
            .await
            .unwrap();
        assert!(hit.matched);
        assert!(hit.requires_review);
        assert_eq!(hit.risk_level, RiskLevel::Critical);
        assert_eq!(hit.matches[0].entity_name, "Boko Haram");
    }
}
