//! LandTena portal server.

use std::sync::Arc;

use identity_provider::{IdentityProvider, OidcProvider};
use keyword_classifier::KeywordClassifier;
use lifecycle::LifecycleEngine;
use portal_web::{app, check_default_landlord, AppState, AuthConfig, Config};
use ticket_core::{DirectoryRoleResolver, DomainRoleResolver, RoleResolver};
use ticket_store::{MemoryAttachmentStore, MemoryTicketStore, SqliteTicketStore, TicketStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting LandTena portal");

    // Ticket store
    let store: Arc<dyn TicketStore> = match &config.database_url {
        Some(url) => {
            let store = SqliteTicketStore::connect(url).await?;
            store.migrate().await?;
            Arc::new(store)
        }
        None => {
            warn!("PORTAL_DATABASE_URL not set, tickets will not survive a restart");
            Arc::new(MemoryTicketStore::new())
        }
    };

    let attachments = Arc::new(MemoryAttachmentStore::with_max_bytes(config.max_upload_bytes));
    let classifier = Arc::new(KeywordClassifier::new());

    let engine = LifecycleEngine::new(store, attachments, classifier)
        .with_default_landlord(&config.default_landlord);

    // Identity and roles
    let identity: Arc<dyn IdentityProvider> = match &config.auth {
        AuthConfig::Oidc(oidc) => Arc::new(OidcProvider::new(oidc.clone())?),
        AuthConfig::Static(provider) => {
            warn!(tokens = provider.len(), "Using development tokens instead of OIDC");
            Arc::new(provider.clone())
        }
    };

    let roles: Arc<dyn RoleResolver> = match &config.role_file {
        Some(path) => {
            let directory = DirectoryRoleResolver::load(path)?;
            info!(entries = directory.len(), path = %path.display(), "Loaded role directory");
            Arc::new(directory)
        }
        None => Arc::new(DomainRoleResolver::default()),
    };
    check_default_landlord(&config.default_landlord, roles.as_ref())?;

    let state = AppState::new(engine, identity, roles, config.max_upload_bytes);

    // Start server
    info!(addr = %config.addr, "Portal listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
