//! NIBSS proxy service
//!
//! Some deployment environments block direct egress to the banking
//! rail; this service tunnels outbound requests through an HTTP(S)
//! forward proxy instead. Proxy routing and (non-production only) TLS
//! relaxation are builder options on this service's own client: they
//! are scoped to the client for its whole lifetime, and there is no
//! process-global flag to flip and restore around calls.

use reqwest::{Client, Method, Proxy};
use std::time::Duration;
use tracing::{debug, info, warn};

use railpay_types::{RailPayError, Result};

use crate::config::Environment;

/// Proxy/egress configuration
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Forward proxy URL, e.g. `http://10.0.0.5:3128`
    pub proxy_url: Option<String>,
    /// Accept self-signed certificates. Refused in production.
    pub accept_invalid_certs: bool,
    pub environment: Environment,
    pub request_timeout_secs: Option<u64>,
}

impl ProxyConfig {
    /// Read configuration from `NIBSS_*` environment variables.
    /// Startup-routine use only.
    pub fn from_env() -> Self {
        Self {
            proxy_url: std::env::var("NIBSS_PROXY_URL").ok(),
            accept_invalid_certs: std::env::var("NIBSS_ACCEPT_INVALID_CERTS")
                .map(|v| v == "true")
                .unwrap_or(false),
            environment: match std::env::var("NIBSS_ENV").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Sandbox,
            },
            request_timeout_secs: None,
        }
    }
}

/// Outbound HTTP tunnel for restricted network environments
#[derive(Debug)]
pub struct NibssProxyService {
    client: Client,
}

impl NibssProxyService {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let mut builder =
            Client::builder().timeout(Duration::from_secs(config.request_timeout_secs.unwrap_or(30)));

        if let Some(url) = &config.proxy_url {
            let proxy = Proxy::all(url)
                .map_err(|e| RailPayError::config(format!("invalid proxy URL {url}: {e}")))?;
            builder = builder.proxy(proxy);
            info!(proxy = %url, "routing NIBSS traffic through forward proxy");
        }

        if config.accept_invalid_certs {
            if config.environment.is_production() {
                return Err(RailPayError::config(
                    "TLS certificate verification cannot be disabled in production",
                ));
            }
            warn!("TLS certificate verification disabled for the NIBSS proxy client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| RailPayError::config(format!("failed to build proxy client: {e}")))?;
        Ok(Self { client })
    }

    /// Issue a request through the proxy. Non-2xx responses fail with
    /// `UpstreamError`; successful bodies that are not valid JSON fall
    /// back to the raw text (some upstream error pages are not JSON).
    pub async fn make_proxied_request(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value> {
        debug!(method = %method, url, "proxied NIBSS request");

        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RailPayError::Timeout {
                    operation: format!("{method} {url}"),
                }
            } else {
                RailPayError::Network {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| RailPayError::Network {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(RailPayError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
    }
}
