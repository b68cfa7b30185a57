//! Identity verification for the LandTena ticket tracker.
//!
//! Callers authenticate with a hosted OpenID Connect login page (AWS
//! Cognito with federated Google sign-in). The page redirects back with an
//! ID token in the URL fragment; the browser then presents that token as a
//! bearer token. This crate verifies it and yields an [`Identity`].
//!
//! - [`OidcProvider`] verifies RS256 ID tokens against the provider's key set
//! - [`StaticProvider`] maps fixed tokens to emails for development and tests
//!
//! # Example
//!
//! ```no_run
//! use identity_provider::{IdentityProvider, OidcConfig, OidcProvider};
//!
//! # async fn example(token: &str) -> Result<(), identity_provider::AuthError> {
//! let config = OidcConfig::from_env()?;
//! let provider = OidcProvider::new(config)?;
//!
//! let identity = provider.verify(token).await?;
//! println!("Signed in as {}", identity.email);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fragment;
pub mod oidc;
pub mod provider;
pub mod static_provider;

pub use config::{OidcConfig, LOGIN_SCOPE};
pub use error::AuthError;
pub use fragment::{parse_fragment, token_from_fragment};
pub use oidc::OidcProvider;
pub use provider::IdentityProvider;
pub use static_provider::StaticProvider;
pub use ticket_core::Identity;
