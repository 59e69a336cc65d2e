//! NIBSS authentication service
//!
//! OAuth2 client-credentials token lifecycle plus per-request
//! HMAC-SHA256 signing. Token states:
//!
//! ```text
//! NO_TOKEN -> TOKEN_VALID -> TOKEN_EXPIRED -> TOKEN_VALID (refreshed) -> ...
//! ```
//!
//! The cached `{token, expiry}` pair is swapped as a whole struct under
//! a write lock, and refreshes are single-flighted: concurrent callers
//! that miss the cache queue on one refresh instead of each hitting the
//! token endpoint. Signatures are never cached: every call draws a
//! fresh nonce, so a captured signature cannot be replayed.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use reqwest::{Client, Method};
use serde::Deserialize;
use sha2::Sha256;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use railpay_types::{RailPayError, Result};

use crate::config::NibssConfig;

type HmacSha256 = Hmac<Sha256>;

/// Seconds subtracted from the issued lifetime so a token is refreshed
/// before the rail would reject it
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Fallback lifetime when the token endpoint omits `expires_in`
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// A one-shot request signature
#[derive(Debug, Clone)]
pub struct Signature {
    pub nonce: String,
    pub signature: String,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

/// OAuth2 token cache and request signer for the NIBSS API
#[derive(Debug)]
pub struct NibssAuthService {
    config: NibssConfig,
    client: Client,
    token: RwLock<Option<CachedToken>>,
    /// Single-flight guard for token refreshes
    refresh: Mutex<()>,
}

impl NibssAuthService {
    /// Build the service. A missing client secret is a startup-time
    /// configuration error, not a per-request one.
    pub fn new(config: NibssConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RailPayError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            token: RwLock::new(None),
            refresh: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &NibssConfig {
        &self.config
    }

    /// Get a bearer token, reusing the cached one while it is valid.
    ///
    /// On a cache miss, exactly one caller performs the
    /// client-credentials exchange; the rest wait and re-read the
    /// cache. The last successful response wins.
    pub async fn get_access_token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.access_token.clone());
        }

        let _refresh = self.refresh.lock().await;
        // Another caller may have refreshed while we waited
        if let Some(token) = self.token.read().await.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.access_token.clone());
        }

        let fresh = self.request_token().await?;
        let access_token = fresh.access_token.clone();
        *self.token.write().await = Some(fresh);
        Ok(access_token)
    }

    async fn request_token(&self) -> Result<CachedToken> {
        let url = format!("{}/v2/auth/token", self.config.base_url);
        info!("requesting new NIBSS access token");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                RailPayError::authentication(format!("token endpoint unreachable: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RailPayError::authentication(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            RailPayError::authentication(format!("malformed token response: {e}"))
        })?;

        let lifetime = token.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        let lifetime = (lifetime - TOKEN_EXPIRY_MARGIN_SECS).max(0);
        debug!(lifetime_secs = lifetime, "NIBSS access token cached");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(lifetime),
        })
    }

    /// Sign a request. Each call draws a fresh random nonce; the
    /// signature is HMAC-SHA256 over `method + path + body + nonce`
    /// keyed by the client secret.
    pub fn generate_signature(&self, method: &Method, path: &str, body: Option<&str>) -> Signature {
        let mut nonce_bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = format!("{}{}", hex::encode(nonce_bytes), Utc::now().timestamp_millis());

        let mut mac = HmacSha256::new_from_slice(self.config.client_secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(method.as_str().as_bytes());
        mac.update(path.as_bytes());
        if let Some(body) = body {
            mac.update(body.as_bytes());
        }
        mac.update(nonce.as_bytes());

        Signature {
            nonce,
            signature: BASE64.encode(mac.finalize().into_bytes()),
        }
    }

    /// The header set the NIBSS API expects: bearer token plus
    /// signature material
    pub async fn build_auth_headers(
        &self,
        method: &Method,
        path: &str,
        body: Option<&str>,
    ) -> Result<HashMap<String, String>> {
        let token = self.get_access_token().await?;
        let Signature { nonce, signature } = self.generate_signature(method, path, body);

        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        headers.insert("X-Client-ID".to_string(), self.config.client_id.clone());
        headers.insert("X-API-Key".to_string(), self.config.api_key.clone());
        headers.insert("X-Nonce".to_string(), nonce);
        headers.insert("X-Signature".to_string(), signature);
        headers.insert(
            "X-Timestamp".to_string(),
            Utc::now().timestamp_millis().to_string(),
        );
        Ok(headers)
    }

    /// Make an authenticated JSON request to the NIBSS API
    pub async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value> {
        self.request_with_headers(method, endpoint, body, &[]).await
    }

    /// Like [`make_request`](Self::make_request), with additional
    /// caller-supplied headers (e.g. NIP payload signatures)
    pub async fn request_with_headers(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
        extra_headers: &[(&str, String)],
    ) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let body_string = match body {
            Some(value) => Some(
                serde_json::to_string(value)
                    .map_err(|e| RailPayError::validation("body", e.to_string()))?,
            ),
            None => None,
        };

        let headers = self
            .build_auth_headers(&method, endpoint, body_string.as_deref())
            .await?;

        debug!(method = %method, endpoint, "NIBSS request");

        let mut request = self.client.request(method.clone(), &url);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        for (name, value) in extra_headers {
            request = request.header(*name, value.as_str());
        }
        if let Some(body_string) = body_string {
            request = request.body(body_string);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RailPayError::Timeout {
                    operation: format!("{method} {endpoint}"),
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
            warn!(status = %status, endpoint, "NIBSS request failed");
            return Err(RailPayError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        // Some NIBSS endpoints answer with non-JSON bodies on success
        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
    }

    /// Probe authentication against a lightweight endpoint, swallowing
    /// transport errors into `false`
    pub async fn test_authentication(&self) -> bool {
        match self.make_request(Method::GET, "/api/v1/banks", None).await {
            Ok(_) => {
                info!("NIBSS authentication test succeeded");
                true
            }
            Err(e) => {
                warn!(error = %e, "NIBSS authentication test failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NibssConfig {
        NibssConfig {
            // Nothing listens here; tests must not depend on a network
            base_url: "http://127.0.0.1:9".to_string(),
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            api_key: "test-api-key".to_string(),
            organization_code: "999999".to_string(),
            ..NibssConfig::default()
        }
    }

    fn service() -> NibssAuthService {
        NibssAuthService::new(config()).unwrap()
    }

    #[test]
    fn test_missing_secret_fails_at_construction() {
        let err = NibssAuthService::new(NibssConfig {
            client_secret: String::new(),
            ..config()
        })
        .unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_signatures_are_not_reusable() {
        let service = service();
        let first = service.generate_signature(&Method::POST, "/nip/fundsTransfer", Some("{}"));
        let second = service.generate_signature(&Method::POST, "/nip/fundsTransfer", Some("{}"));

        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.signature, second.signature);
    }

    #[test]
    fn test_signature_shape() {
        let signature = service().generate_signature(&Method::GET, "/api/v1/banks", None);
        // 16 random bytes hex-encoded plus a millisecond timestamp
        assert!(signature.nonce.len() > 32);
        assert!(BASE64.decode(&signature.signature).is_ok());
    }

    #[tokio::test]
    async fn test_cached_token_is_reused() {
        let service = service();
        *service.token.write().await = Some(CachedToken {
            access_token: "cached-token".to_string(),
            expires_at: Utc::now() + chrono::Duration::seconds(300),
        });

        // No network is reachable, so success proves the cache was used
        let token = service.get_access_token().await.unwrap();
        assert_eq!(token, "cached-token");
        let again = service.get_access_token().await.unwrap();
        assert_eq!(again, "cached-token");
    }

    #[tokio::test]
    async fn test_expired_token_triggers_refresh() {
        let service = service();
        *service.token.write().await = Some(CachedToken {
            access_token: "stale-token".to_string(),
            expires_at: Utc::now() - chrono::Duration::seconds(1),
        });

        // The refresh must go to the (unreachable) token endpoint and
        // surface a typed authentication error, not the stale token
        let err = service.get_access_token().await.unwrap_err();
        assert_eq!(err.error_code(), "AUTHENTICATION_FAILED");
    }

    #[tokio::test]
    async fn test_build_auth_headers_shape() {
        let service = service();
        *service.token.write().await = Some(CachedToken {
            access_token: "cached-token".to_string(),
            expires_at: Utc::now() + chrono::Duration::seconds(300),
        });

        let headers = service
            .build_auth_headers(&Method::POST, "/nip/nameenquiry", Some("{}"))
            .await
            .unwrap();

        assert_eq!(
            headers.get("Authorization").map(String::as_str),
            Some("Bearer cached-token")
        );
        for key in ["X-Client-ID", "X-API-Key", "X-Nonce", "X-Signature", "X-Timestamp"] {
            assert!(headers.contains_key(key), "missing header {key}");
        }
    }

    #[tokio::test]
    async fn test_authentication_probe_swallows_errors() {
        // Unreachable endpoint: the probe reports false, never panics
        assert!(!service().test_authentication().await);
    }
}
