//! Route handlers for the portal.

pub mod attachments;
pub mod auth;
pub mod health;
pub mod page;
pub mod tickets;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // HTML page
        .route("/", get(page::portal_page))
        // Health check
        .route("/health", get(health::health))
        // Authentication
        .route("/login", get(auth::login))
        .route("/api/me", get(auth::me))
        .route("/api/session", post(auth::session))
        // Tickets
        .route("/api/tickets", get(tickets::list).post(tickets::submit))
        .route("/api/tickets/:id", get(tickets::show))
        .route("/api/tickets/:id/actions", post(tickets::apply))
        // Attachments; the handler enforces its own size limit
        .route(
            "/api/attachments",
            post(attachments::upload).layer(DefaultBodyLimit::disable()),
        )
        .route("/api/attachments/:id", get(attachments::download))
}
