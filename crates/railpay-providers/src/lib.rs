//! RailPay Providers - Payment and compliance provider abstraction
//!
//! This crate defines the contracts every regional rail implements:
//!
//! - [`PaymentProvider`]: account validation, transfers, status, bank
//!   lists, limits, and fees for one payment network
//! - [`ComplianceProvider`]: KYC tiering, regulatory limits, and
//!   sanctions screening for one jurisdiction
//! - [`ProviderCore`]: the shared config/initialization state every
//!   concrete provider owns and delegates to (composition, not a base
//!   class)
//! - [`PaymentProviderRegistry`] / [`ComplianceProviderRegistry`]:
//!   insertion-ordered lookup tables the startup routine constructs and
//!   injects wherever routing decisions are made
//!
//! ## Key Design Principles
//!
//! 1. No operation except `initialize` may run before `initialize`
//! 2. `transfer` must be idempotent under the caller-supplied reference
//! 3. Registries are plain values owned by the application: there is
//!    no hidden module-level singleton

pub mod compliance;
pub mod core;
pub mod payment;
pub mod registry;

pub use self::compliance::*;
pub use self::core::*;
pub use self::payment::*;
pub use self::registry::*;
