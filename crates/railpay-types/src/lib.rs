//! RailPay Types - Canonical domain types for the payment core
//!
//! This crate contains the foundational types for RailPay with zero
//! dependencies on other railpay crates. It defines:
//!
//! - Currency and bank-code types used for provider routing
//! - Transfer, account-validation, status, and bank-list wire types
//! - Provider capability sets
//! - KYC levels, regulatory limits, and sanctions-screening types
//! - The shared error taxonomy
//!
//! # Architectural Invariants
//!
//! 1. Every money movement carries a caller-supplied reference used for
//!    idempotency and status lookup
//! 2. No operation may run on a provider before `initialize`
//! 3. Failure is explicit: ambiguous transfer outcomes are surfaced as
//!    their own error, never conflated with definite failure

pub mod bank;
pub mod compliance;
pub mod currency;
pub mod error;
pub mod transfer;

pub use bank::*;
pub use compliance::*;
pub use currency::*;
pub use error::*;
pub use transfer::*;
