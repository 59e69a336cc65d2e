//! Bank identification types
//!
//! Bank code schemes differ per region: NIBSS institution codes in
//! Nigeria, ABA routing numbers in the USA, SWIFT/BIC internationally,
//! transit numbers in Canada, sort codes in the UK. The code type is
//! what routes a request to the right provider.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::currency::Currency;

/// Bank code scheme, used to select a payment provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BankCodeType {
    /// NIBSS institution code (Nigeria)
    Nibss,
    /// ABA routing number (USA)
    Routing,
    /// SWIFT/BIC code (international)
    Swift,
    /// Transit number (Canada)
    Transit,
    /// Sort code (UK)
    SortCode,
}

impl BankCodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nibss => "NIBSS",
            Self::Routing => "ROUTING",
            Self::Swift => "SWIFT",
            Self::Transit => "TRANSIT",
            Self::SortCode => "SORT_CODE",
        }
    }
}

impl fmt::Display for BankCodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bank reachable through a payment provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    /// Institution code in the provider's scheme
    pub code: String,
    pub name: String,
    pub code_type: BankCodeType,
    /// ISO 3166-1 alpha-2 country code
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swift_code: Option<String>,
    pub active: bool,
}
