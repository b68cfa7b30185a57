//! Web portal and JSON API for the LandTena ticket tracker.
//!
//! Serves a single portal page plus a bearer-authenticated JSON API over the
//! lifecycle engine. See [`routes::router`] for the full route table.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::{check_default_landlord, AuthConfig, Config, ConfigError};
pub use error::PortalError;
pub use state::AppState;

/// Build the complete application with request tracing.
pub fn app(state: AppState) -> Router {
    routes::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
