//! Bearer-token authentication.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use ticket_core::Actor;
use tracing::debug;

use crate::error::PortalError;
use crate::state::AppState;

/// The verified caller, with their resolved role.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let unauthenticated = || PortalError::Unauthenticated {
            login_url: state.identity.login_url(),
        };

        let token = bearer_token(&parts.headers).ok_or_else(unauthenticated)?;

        let identity = state.identity.verify(token).await.map_err(|e| {
            debug!(provider = state.identity.name(), "Token rejected: {}", e);
            unauthenticated()
        })?;

        let actor = state.roles.actor(identity);
        debug!(email = %actor.email(), role = %actor.role, "Authenticated request");
        Ok(CurrentActor(actor))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }
}
