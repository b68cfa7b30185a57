//! The identity provider seam.

use async_trait::async_trait;
use ticket_core::Identity;

use crate::error::AuthError;

/// Verifies bearer tokens and yields the caller's identity.
///
/// Implementations must fail closed: anything short of a fully verified
/// token is an error, never a partial identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a token and return the identity it asserts.
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;

    /// URL of the hosted login page, if this provider has one.
    fn login_url(&self) -> Option<String> {
        None
    }

    /// Provider name for logs.
    fn name(&self) -> &str;
}
