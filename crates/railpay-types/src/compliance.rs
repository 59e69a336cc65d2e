//! Compliance types
//!
//! KYC tiers, regulatory limits, and sanctions-screening results shared
//! by all regional compliance providers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::currency::Currency;

/// Tiered customer-verification status gating transaction limits
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum KycLevel {
    Basic,
    Intermediate,
    Advanced,
}

impl KycLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for KycLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operations whose KYC requirement is tiered by amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceOperation {
    Transfer,
    Withdrawal,
    Deposit,
}

/// Regulatory thresholds for a region, in the region's currency.
///
/// The tiered KYC requirement is a pure function of these values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulatoryLimits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_transaction_limit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_transaction_limit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_transaction_limit: Option<Decimal>,
    /// Currency/cash transaction reporting threshold
    pub cash_reporting_threshold: Decimal,
    /// Suspicious activity reporting threshold
    pub suspicious_activity_threshold: Decimal,
    /// Enhanced due diligence required at or above this amount
    pub enhanced_due_diligence_threshold: Decimal,
    pub currency: Currency,
}

/// What a compliance provider can do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceCapabilities {
    pub supports_kyc: bool,
    pub supports_aml: bool,
    pub supports_sanctions_screening: bool,
    pub supports_pep_screening: bool,
    /// e.g. ["CBN", "NFIU"]
    pub regulatory_bodies: Vec<String>,
}

/// Risk classification attached to screening results
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanctionedEntityType {
    Individual,
    Entity,
}

/// A single hit against a sanctions list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanctionsMatch {
    /// e.g. "OFAC", "UN", "EU"
    pub list_name: String,
    pub entity_name: String,
    pub entity_type: SanctionedEntityType,
    /// Sanctions program, e.g. "SDGT"
    pub program: String,
    /// 0-100
    pub match_score: u8,
}

/// Result of screening a name against the designated lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanctionsScreenResult {
    pub matched: bool,
    pub matches: Vec<SanctionsMatch>,
    pub risk_level: RiskLevel,
    pub requires_review: bool,
}

impl SanctionsScreenResult {
    /// A clean screen with no hits
    pub fn clear() -> Self {
        Self {
            matched: false,
            matches: Vec::new(),
            risk_level: RiskLevel::Low,
            requires_review: false,
        }
    }
}
