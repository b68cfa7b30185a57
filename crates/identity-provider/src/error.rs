//! Error types for identity verification.

use thiserror::Error;
use ticket_core::TicketError;

/// Errors that can occur while verifying a caller's identity.
///
/// Every variant fails closed: the caller is treated as unauthenticated.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token accompanied the request.
    #[error("missing token")]
    MissingToken,

    /// HTTP request to the provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider did not answer within the configured timeout.
    #[error("identity provider timed out")]
    Timeout,

    /// Key set endpoint returned a non-success status.
    #[error("key set request failed with status {0}")]
    JwksStatus(u16),

    /// Key set document could not be parsed.
    #[error("invalid key set: {0}")]
    Jwks(String),

    /// Token was signed with a key the provider does not publish.
    #[error("unknown signing key: {0}")]
    UnknownKey(String),

    /// Signature, audience, issuer or expiry check failed.
    #[error("invalid token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// A required claim is absent or empty.
    #[error("token missing claim: {0}")]
    MissingClaim(&'static str),

    /// Token is not an ID token.
    #[error("unexpected token use: {0}")]
    WrongTokenUse(String),

    /// Token not recognised by a static provider.
    #[error("unknown token")]
    UnknownToken,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AuthError {
    /// Whether retrying the provider call could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AuthError::Http(err) => err.is_connect() || err.is_timeout() || err.is_request(),
            AuthError::Timeout => true,
            AuthError::JwksStatus(status) => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<AuthError> for TicketError {
    fn from(_: AuthError) -> Self {
        TicketError::Unauthenticated
    }
}
