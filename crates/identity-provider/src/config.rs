//! Configuration types for the OpenID Connect provider.

use std::env;
use std::time::Duration;

use crate::error::AuthError;

/// Scopes requested on the hosted login page.
pub const LOGIN_SCOPE: &str = "openid profile email";

/// Configuration for verifying ID tokens issued by a hosted OIDC provider
/// (AWS Cognito with federated Google sign-in by default).
#[derive(Debug, Clone)]
pub struct OidcConfig {
    /// Hosted login domain (e.g., "example.auth.us-west-2.amazoncognito.com").
    pub domain: String,
    /// This application's client id. Tokens must carry it as audience.
    pub client_id: String,
    /// Where the provider redirects after login.
    pub redirect_uri: String,
    /// Cognito region, used to derive key set and issuer URLs.
    pub region: Option<String>,
    /// Cognito user pool id, used to derive key set and issuer URLs.
    pub user_pool_id: Option<String>,
    /// Explicit key set URL, overriding the derived one.
    pub jwks_url: Option<String>,
    /// Explicit expected issuer, overriding the derived one.
    pub issuer: Option<String>,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Retries after the first failed key set fetch.
    pub max_retries: u32,
    /// Base delay between retries, multiplied by the attempt number.
    pub retry_backoff: Duration,
    /// Minimum time between key set refreshes triggered by unknown key ids.
    pub refresh_interval: Duration,
}

impl OidcConfig {
    /// Create a new configuration with defaults for timeout and retries.
    pub fn new(
        domain: impl Into<String>,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            region: None,
            user_pool_id: None,
            jwks_url: None,
            issuer: None,
            timeout: Duration::from_secs(5),
            max_retries: 2,
            retry_backoff: Duration::from_millis(250),
            refresh_interval: Duration::from_secs(60),
        }
    }

    /// Set the Cognito region and user pool.
    pub fn with_user_pool(mut self, region: impl Into<String>, user_pool_id: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self.user_pool_id = Some(user_pool_id.into());
        self
    }

    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = Some(url.into());
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `OIDC_DOMAIN` | Hosted login domain | (required) |
    /// | `OIDC_CLIENT_ID` | Application client id | (required) |
    /// | `OIDC_REDIRECT_URI` | Post-login redirect | `http://localhost:8501` |
    /// | `OIDC_REGION` | Cognito region | - |
    /// | `OIDC_USER_POOL_ID` | Cognito user pool id | - |
    /// | `OIDC_JWKS_URL` | Key set URL override | derived from pool |
    /// | `OIDC_ISSUER` | Expected issuer override | derived from pool |
    /// | `OIDC_TIMEOUT_SECS` | HTTP timeout | `5` |
    /// | `OIDC_MAX_RETRIES` | Key set fetch retries | `2` |
    /// | `OIDC_REFRESH_SECS` | Minimum seconds between key set refreshes | `60` |
    pub fn from_env() -> Result<Self, AuthError> {
        let domain = env::var("OIDC_DOMAIN")
            .map_err(|_| AuthError::Config("OIDC_DOMAIN not set".to_string()))?;
        let client_id = env::var("OIDC_CLIENT_ID")
            .map_err(|_| AuthError::Config("OIDC_CLIENT_ID not set".to_string()))?;
        let redirect_uri = env::var("OIDC_REDIRECT_URI")
            .unwrap_or_else(|_| "http://localhost:8501".to_string());

        let mut config = Self::new(domain, client_id, redirect_uri);
        config.region = non_empty_var("OIDC_REGION");
        config.user_pool_id = non_empty_var("OIDC_USER_POOL_ID");
        config.jwks_url = non_empty_var("OIDC_JWKS_URL");
        config.issuer = non_empty_var("OIDC_ISSUER");

        if let Some(secs) = env::var("OIDC_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()) {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = env::var("OIDC_MAX_RETRIES").ok().and_then(|v| v.parse().ok()) {
            config.max_retries = retries;
        }
        if let Some(secs) = env::var("OIDC_REFRESH_SECS").ok().and_then(|v| v.parse().ok()) {
            config.refresh_interval = Duration::from_secs(secs);
        }

        // Fail at startup rather than on the first login
        config.jwks_url()?;
        Ok(config)
    }

    fn pool_base_url(&self) -> Option<String> {
        match (&self.region, &self.user_pool_id) {
            (Some(region), Some(pool)) => Some(format!(
                "https://cognito-idp.{}.amazonaws.com/{}",
                region, pool
            )),
            _ => None,
        }
    }

    /// Get the key set URL.
    pub fn jwks_url(&self) -> Result<String, AuthError> {
        if let Some(url) = &self.jwks_url {
            return Ok(url.clone());
        }
        self.pool_base_url()
            .map(|base| format!("{}/.well-known/jwks.json", base))
            .ok_or_else(|| {
                AuthError::Config(
                    "set OIDC_JWKS_URL or both OIDC_REGION and OIDC_USER_POOL_ID".to_string(),
                )
            })
    }

    /// Get the expected token issuer, if one can be determined.
    pub fn issuer(&self) -> Option<String> {
        self.issuer.clone().or_else(|| self.pool_base_url())
    }

    /// Get the hosted login URL (implicit flow, tokens returned in the fragment).
    pub fn login_url(&self) -> String {
        let base = if self.domain.starts_with("http://") || self.domain.starts_with("https://") {
            self.domain.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", self.domain.trim_end_matches('/'))
        };

        format!(
            "{}/login?client_id={}&response_type=token&scope={}&redirect_uri={}",
            base,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(LOGIN_SCOPE),
            urlencoding::encode(&self.redirect_uri),
        )
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OidcConfig {
        OidcConfig::new(
            "landtena.auth.us-west-2.amazoncognito.com",
            "client-123",
            "http://localhost:8501",
        )
    }

    #[test]
    fn test_login_url() {
        assert_eq!(
            config().login_url(),
            "https://landtena.auth.us-west-2.amazoncognito.com/login?client_id=client-123\
             &response_type=token&scope=openid%20profile%20email\
             &redirect_uri=http%3A%2F%2Flocalhost%3A8501"
        );
    }

    #[test]
    fn test_login_url_keeps_explicit_scheme() {
        let config = OidcConfig::new("http://127.0.0.1:9000/", "c", "r");
        assert!(config.login_url().starts_with("http://127.0.0.1:9000/login?"));
    }

    #[test]
    fn test_derived_urls() {
        let config = config().with_user_pool("us-west-2", "us-west-2_AbC");
        assert_eq!(
            config.jwks_url().unwrap(),
            "https://cognito-idp.us-west-2.amazonaws.com/us-west-2_AbC/.well-known/jwks.json"
        );
        assert_eq!(
            config.issuer().unwrap(),
            "https://cognito-idp.us-west-2.amazonaws.com/us-west-2_AbC"
        );
    }

    #[test]
    fn test_overrides_win() {
        let config = config()
            .with_user_pool("us-west-2", "pool")
            .with_jwks_url("http://localhost/jwks.json")
            .with_issuer("https://issuer.test");
        assert_eq!(config.jwks_url().unwrap(), "http://localhost/jwks.json");
        assert_eq!(config.issuer().unwrap(), "https://issuer.test");
    }

    #[test]
    fn test_missing_key_source() {
        assert!(matches!(config().jwks_url(), Err(AuthError::Config(_))));
        assert!(config().issuer().is_none());
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
    }
}
