//! The single-page portal.

use askama::Template;
use axum::extract::State;

use crate::state::AppState;

/// Portal page template. Everything after login is driven by the JSON API.
#[derive(Template)]
#[template(path = "portal.html")]
pub struct PortalTemplate {
    /// Whether a hosted login page exists; otherwise a token field is shown.
    pub hosted_login: bool,
}

/// Render the portal page.
pub async fn portal_page(State(state): State<AppState>) -> PortalTemplate {
    PortalTemplate {
        hosted_login: state.identity.login_url().is_some(),
    }
}
