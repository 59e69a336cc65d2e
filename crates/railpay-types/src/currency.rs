//! Currency types for RailPay
//!
//! Fiat currencies reachable through the supported payment rails.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fiat currency codes (ISO 4217) supported by at least one rail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    NGN,
    USD,
    EUR,
    GBP,
    CAD,
}

impl Currency {
    /// Get the ISO 4217 alphabetic code
    pub fn code(&self) -> &'static str {
        match self {
            Self::NGN => "NGN",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
        }
    }

    /// Get the ISO 4217 numeric code as a string, the form NIP payloads use
    pub fn numeric_code(&self) -> &'static str {
        match self {
            Self::NGN => "566",
            Self::USD => "840",
            Self::EUR => "978",
            Self::GBP => "826",
            Self::CAD => "124",
        }
    }

    /// Get the standard decimal places for this currency
    pub fn decimals(&self) -> u8 {
        2
    }

    /// Parse an ISO 4217 alphabetic code (case-insensitive)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "NGN" => Some(Self::NGN),
            "USD" => Some(Self::USD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            "CAD" => Some(Self::CAD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_codes() {
        assert_eq!(Currency::NGN.code(), "NGN");
        assert_eq!(Currency::NGN.numeric_code(), "566");
        assert_eq!(Currency::from_code("ngn"), Some(Currency::NGN));
        assert_eq!(Currency::from_code("XYZ"), None);
    }
}
