//! Fixed token-to-identity mapping for local development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use ticket_core::Identity;

use crate::error::AuthError;
use crate::provider::IdentityProvider;

/// Provider that accepts a fixed set of opaque tokens.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    tokens: HashMap<String, Identity>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as proof of `email`.
    pub fn with_token(mut self, token: impl Into<String>, email: impl Into<String>) -> Self {
        let email = email.into();
        let identity = Identity::new(email.clone(), email.clone(), email);
        self.tokens.insert(token.into(), identity);
        self
    }

    /// Parse `token=email` pairs separated by commas.
    ///
    /// ```
    /// use identity_provider::StaticProvider;
    ///
    /// let provider = StaticProvider::from_pairs("t1=tenant@example.com, l1=landlord@landlord.com").unwrap();
    /// assert_eq!(provider.len(), 2);
    /// ```
    pub fn from_pairs(pairs: &str) -> Result<Self, AuthError> {
        let mut provider = Self::new();
        for pair in pairs.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (token, email) = pair
                .split_once('=')
                .map(|(t, e)| (t.trim(), e.trim()))
                .filter(|(t, e)| !t.is_empty() && !e.is_empty())
                .ok_or_else(|| AuthError::Config(format!("expected token=email, got '{}'", pair)))?;
            provider = provider.with_token(token, email);
        }
        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for StaticProvider {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        self.tokens.get(token).cloned().ok_or(AuthError::UnknownToken)
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_and_unknown_tokens() {
        let provider = StaticProvider::new().with_token("abc", "tenant@example.com");

        let identity = provider.verify("abc").await.unwrap();
        assert_eq!(identity.email, "tenant@example.com");

        assert!(matches!(provider.verify("xyz").await, Err(AuthError::UnknownToken)));
        assert!(matches!(provider.verify("").await, Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_from_pairs_rejects_malformed() {
        assert!(StaticProvider::from_pairs("").unwrap().is_empty());
        assert!(matches!(
            StaticProvider::from_pairs("abc"),
            Err(AuthError::Config(_))
        ));
        assert!(matches!(
            StaticProvider::from_pairs("abc="),
            Err(AuthError::Config(_))
        ));
    }
}
