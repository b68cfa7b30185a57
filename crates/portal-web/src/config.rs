//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use identity_provider::{AuthError, OidcConfig, StaticProvider};
use lifecycle::DEFAULT_LANDLORD;
use ticket_core::{Identity, Role, RoleResolver};
use ticket_store::DEFAULT_MAX_ATTACHMENT_BYTES;

/// How callers are authenticated.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// Hosted OpenID Connect login.
    Oidc(OidcConfig),
    /// Fixed development tokens.
    Static(StaticProvider),
}

/// Portal server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL. Tickets are kept in memory when unset.
    pub database_url: Option<String>,
    /// Landlord new tickets are routed to.
    pub default_landlord: String,
    /// JSON email→role table. Roles come from email domains when unset.
    pub role_file: Option<PathBuf>,
    /// Largest accepted attachment.
    pub max_upload_bytes: usize,
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `PORTAL_ADDR` | Server bind address | `127.0.0.1:8501` |
    /// | `PORTAL_DATABASE_URL` | SQLite database URL | in-memory store |
    /// | `PORTAL_DEFAULT_LANDLORD` | Landlord for new tickets | `landlord@landlord.com` |
    /// | `PORTAL_ROLE_FILE` | JSON email→role table | domain rules |
    /// | `PORTAL_MAX_UPLOAD_BYTES` | Attachment size limit | `10485760` |
    /// | `PORTAL_DEV_TOKENS` | `token=email` pairs, replaces OIDC | - |
    ///
    /// Without `PORTAL_DEV_TOKENS` the `OIDC_*` variables are required, see
    /// [`OidcConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("PORTAL_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8501".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = non_empty_var("PORTAL_DATABASE_URL");

        let default_landlord = non_empty_var("PORTAL_DEFAULT_LANDLORD")
            .unwrap_or_else(|| DEFAULT_LANDLORD.to_string());

        let role_file = non_empty_var("PORTAL_ROLE_FILE").map(PathBuf::from);

        let max_upload_bytes = match non_empty_var("PORTAL_MAX_UPLOAD_BYTES") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidUploadLimit(value))?,
            None => DEFAULT_MAX_ATTACHMENT_BYTES,
        };

        let auth = match non_empty_var("PORTAL_DEV_TOKENS") {
            Some(pairs) => AuthConfig::Static(
                StaticProvider::from_pairs(&pairs).map_err(ConfigError::DevTokens)?,
            ),
            None => AuthConfig::Oidc(OidcConfig::from_env().map_err(ConfigError::Oidc)?),
        };

        Ok(Self {
            addr,
            database_url,
            default_landlord,
            role_file,
            max_upload_bytes,
            auth,
        })
    }
}

/// Fail unless `email` resolves to the landlord role.
///
/// Every new ticket is routed to the default landlord, so an address the
/// resolver treats as a tenant or contractor would strand all tickets.
pub fn check_default_landlord(email: &str, roles: &dyn RoleResolver) -> Result<(), ConfigError> {
    let role = roles.resolve(&Identity::new(email, email, ""));
    if role != Role::Landlord {
        return Err(ConfigError::DefaultLandlordRole {
            email: email.to_string(),
            role,
        });
    }
    Ok(())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORTAL_ADDR format")]
    InvalidAddr,

    #[error("Invalid PORTAL_MAX_UPLOAD_BYTES: {0}")]
    InvalidUploadLimit(String),

    #[error("Invalid PORTAL_DEV_TOKENS: {0}")]
    DevTokens(AuthError),

    #[error("OIDC configuration: {0}")]
    Oidc(AuthError),

    #[error("PORTAL_DEFAULT_LANDLORD {email} resolves to role {role}, not landlord")]
    DefaultLandlordRole { email: String, role: Role },
}
