//! Error types for the portal.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use ticket_core::TicketError;
use ticket_store::StoreError;

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum PortalError {
    /// No valid identity accompanied the request.
    #[error("authentication required")]
    Unauthenticated { login_url: Option<String> },

    /// Domain error from the engine or stores.
    #[error(transparent)]
    Ticket(#[from] TicketError),

    /// Download of an attachment that does not exist.
    #[error("attachment {0} not found")]
    AttachmentNotFound(String),
}

impl From<StoreError> for PortalError {
    fn from(err: StoreError) -> Self {
        PortalError::Ticket(err.into())
    }
}

impl PortalError {
    pub fn status(&self) -> StatusCode {
        match self {
            PortalError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            PortalError::Ticket(err) => match err {
                TicketError::Unauthenticated => StatusCode::UNAUTHORIZED,
                TicketError::Unauthorized(_) => StatusCode::FORBIDDEN,
                TicketError::NotFound(_) => StatusCode::NOT_FOUND,
                TicketError::InvalidTransition { .. } | TicketError::Conflict(_) => {
                    StatusCode::CONFLICT
                }
                TicketError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                TicketError::Store(_) | TicketError::Classifier(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            PortalError::AttachmentNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PortalError::Unauthenticated { .. } => "unauthenticated",
            PortalError::Ticket(err) => err.kind(),
            PortalError::AttachmentNotFound(_) => "not_found",
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}: {}", self.kind(), self);
        } else {
            tracing::debug!(status = status.as_u16(), "{}: {}", self.kind(), self);
        }

        let mut error = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let PortalError::Unauthenticated {
            login_url: Some(url),
        } = &self
        {
            error["login_url"] = serde_json::Value::String(url.clone());
        }

        (status, Json(serde_json::json!({ "error": error }))).into_response()
    }
}

/// Result type for portal handlers.
pub type Result<T> = std::result::Result<T, PortalError>;
