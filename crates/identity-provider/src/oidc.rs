//! OpenID Connect ID token verification against a published key set.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use ticket_core::Identity;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::OidcConfig;
use crate::error::AuthError;
use crate::provider::IdentityProvider;

/// Claims read from a verified ID token.
#[derive(Debug, Deserialize)]
struct IdClaims {
    sub: Option<String>,
    email: Option<String>,
    name: Option<String>,
    token_use: Option<String>,
}

/// Cached key set and when it was fetched.
#[derive(Default)]
struct KeyCache {
    keys: Option<JwkSet>,
    fetched_at: Option<Instant>,
}

impl KeyCache {
    fn refreshed_within(&self, interval: Duration) -> bool {
        self.fetched_at.is_some_and(|at| at.elapsed() < interval)
    }
}

/// Verifies ID tokens issued by a hosted OIDC provider.
///
/// The key set is fetched lazily and cached. A token signed with a key id
/// missing from the cache triggers one refresh, which covers key rotation.
/// Such refreshes happen at most once per `refresh_interval`.
#[derive(Clone)]
pub struct OidcProvider {
    http: Client,
    config: OidcConfig,
    jwks_url: String,
    keys: Arc<RwLock<KeyCache>>,
}

impl OidcProvider {
    /// Create a provider. No network call is made until the first verification.
    pub fn new(config: OidcConfig) -> Result<Self, AuthError> {
        let jwks_url = config.jwks_url()?;
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AuthError::Http)?;

        info!("OIDC provider using key set at {}", jwks_url);

        Ok(Self {
            http,
            config,
            jwks_url,
            keys: Arc::new(RwLock::new(KeyCache::default())),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &OidcConfig {
        &self.config
    }

    /// Fetch the key set, retrying transient failures.
    async fn fetch_keys(&self) -> Result<JwkSet, AuthError> {
        let mut attempt = 0;
        loop {
            match self.fetch_keys_once().await {
                Ok(keys) => return Ok(keys),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.retry_backoff * attempt;
                    warn!(
                        "Key set fetch failed ({}), retry {}/{} in {:?}",
                        e, attempt, self.config.max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_keys_once(&self) -> Result<JwkSet, AuthError> {
        debug!("Fetching key set: {}", self.jwks_url);

        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(timeout_aware)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::JwksStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(timeout_aware)?;
        serde_json::from_str(&body).map_err(|e| AuthError::Jwks(e.to_string()))
    }

    /// Look up the decoding key for a key id, refreshing the cache once if needed.
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(jwk) = self.keys.read().await.keys.as_ref().and_then(|k| k.find(kid)) {
            return Ok(DecodingKey::from_jwk(jwk)?);
        }

        // Refreshes are serialized; another request may have refreshed already.
        let mut cache = self.keys.write().await;
        if let Some(keys) = cache.keys.as_ref() {
            if let Some(jwk) = keys.find(kid) {
                return Ok(DecodingKey::from_jwk(jwk)?);
            }
            if cache.refreshed_within(self.config.refresh_interval) {
                debug!("Key {} unknown, key set refreshed recently", kid);
                return Err(AuthError::UnknownKey(kid.to_string()));
            }
        }

        let fresh = self.fetch_keys().await?;
        let key = fresh.find(kid).map(DecodingKey::from_jwk).transpose()?;
        cache.keys = Some(fresh);
        cache.fetched_at = Some(Instant::now());

        key.ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.config.client_id.as_str()]);
        if let Some(issuer) = self.config.issuer() {
            validation.set_issuer(&[issuer]);
        }
        validation
    }
}

fn timeout_aware(err: reqwest::Error) -> AuthError {
    if err.is_timeout() {
        AuthError::Timeout
    } else {
        AuthError::Http(err)
    }
}

#[async_trait]
impl IdentityProvider for OidcProvider {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let header = decode_header(token)?;
        let kid = header.kid.ok_or(AuthError::MissingClaim("kid"))?;
        let key = self.decoding_key(&kid).await?;

        let claims = decode::<IdClaims>(token, &key, &self.validation())?.claims;

        if let Some(token_use) = claims.token_use {
            if token_use != "id" {
                return Err(AuthError::WrongTokenUse(token_use));
            }
        }

        let email = claims
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or(AuthError::MissingClaim("email"))?;
        let subject_id = claims
            .sub
            .filter(|s| !s.trim().is_empty())
            .ok_or(AuthError::MissingClaim("sub"))?;

        debug!("Verified token for {}", email);

        Ok(Identity::new(
            email.trim(),
            subject_id,
            claims.name.unwrap_or_default(),
        ))
    }

    fn login_url(&self) -> Option<String> {
        Some(self.config.login_url())
    }

    fn name(&self) -> &str {
        "oidc"
    }
}
