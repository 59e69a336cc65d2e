//! RailPay NIBSS - the Nigeria Inter-Bank Settlement System rail
//!
//! Concrete integration with NIBSS NIP (NIBSS Instant Payment):
//!
//! - [`NibssAuthService`]: OAuth2 client-credentials token cache and
//!   HMAC-SHA256 request signing for the NIBSS API
//! - [`NibssProvider`]: the [`PaymentProvider`] implementation: name
//!   enquiry, NIP funds transfer, status, bank table, CBN fee and
//!   limit schedules
//! - [`NibssProxyService`]: outbound forward-proxy client for
//!   environments where direct egress to the rail is blocked
//!
//! All credentials and URLs arrive through [`NibssConfig`]; nothing in
//! this crate reads process environment outside `from_env`
//! constructors on the config types.
//!
//! [`PaymentProvider`]: railpay_providers::PaymentProvider

pub mod auth;
pub mod config;
pub mod provider;
pub mod proxy;

pub use auth::{NibssAuthService, Signature};
pub use config::{Environment, NibssConfig};
pub use provider::NibssProvider;
pub use proxy::{NibssProxyService, ProxyConfig};
