//! Application state shared across handlers.

use std::sync::Arc;

use identity_provider::IdentityProvider;
use lifecycle::LifecycleEngine;
use ticket_core::RoleResolver;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Lifecycle engine owning the ticket and attachment stores.
    pub engine: Arc<LifecycleEngine>,
    /// Verifies bearer tokens.
    pub identity: Arc<dyn IdentityProvider>,
    /// Maps verified identities to roles.
    pub roles: Arc<dyn RoleResolver>,
    /// Largest accepted attachment body.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        engine: LifecycleEngine,
        identity: Arc<dyn IdentityProvider>,
        roles: Arc<dyn RoleResolver>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            identity,
            roles,
            max_upload_bytes,
        }
    }
}
