//! Login redirect and caller introspection.

use axum::extract::State;
use axum::response::Redirect;
use axum::Json;
use identity_provider::token_from_fragment;
use serde::{Deserialize, Serialize};
use ticket_core::{Actor, Role};
use tracing::{debug, info};

use crate::auth::CurrentActor;
use crate::error::{PortalError, Result};
use crate::state::AppState;

/// The caller as the portal sees them.
#[derive(Debug, Serialize)]
pub struct Me {
    pub email: String,
    pub name: String,
    pub subject_id: String,
    pub role: Role,
}

impl From<Actor> for Me {
    fn from(actor: Actor) -> Self {
        Self {
            role: actor.role,
            email: actor.identity.email,
            name: actor.identity.name,
            subject_id: actor.identity.subject_id,
        }
    }
}

/// The URL fragment the hosted login page redirected back with.
#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub fragment: String,
}

/// A verified ID token and the caller it belongs to.
#[derive(Debug, Serialize)]
pub struct Session {
    pub id_token: String,
    pub me: Me,
}

/// Send the browser to the hosted login page, or home when there is none.
pub async fn login(State(state): State<AppState>) -> Redirect {
    match state.identity.login_url() {
        Some(url) => Redirect::to(&url),
        None => Redirect::to("/"),
    }
}

/// Exchange a login redirect fragment for a verified session.
///
/// The token is only handed back to the page once it has been verified.
pub async fn session(
    State(state): State<AppState>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<Session>> {
    let unauthenticated = || PortalError::Unauthenticated {
        login_url: state.identity.login_url(),
    };

    let id_token = token_from_fragment(&request.fragment).ok_or_else(unauthenticated)?;
    let identity = state.identity.verify(&id_token).await.map_err(|e| {
        debug!(provider = state.identity.name(), "Login token rejected: {}", e);
        unauthenticated()
    })?;

    let actor = state.roles.actor(identity);
    info!(email = %actor.email(), role = %actor.role, "Session started");

    Ok(Json(Session {
        id_token,
        me: Me::from(actor),
    }))
}

/// Who am I, and in which role.
pub async fn me(CurrentActor(actor): CurrentActor) -> Json<Me> {
    Json(Me::from(actor))
}
