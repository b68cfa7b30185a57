//! Error types for ticket operations.

use thiserror::Error;

use crate::action::ActionKind;
use crate::ticket::{Status, TicketId};
use crate::validation::ValidationError;

/// Errors that can occur during classification.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The classifier backend is temporarily unavailable.
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    /// The description could not be classified.
    #[error("classification failed: {0}")]
    Failed(String),

    /// A timeout occurred while classifying.
    #[error("classification timed out")]
    Timeout,
}

/// Errors surfaced at the request boundary.
///
/// None of these are fatal to the process. A failed request leaves the
/// ticket record untouched.
#[derive(Debug, Error)]
pub enum TicketError {
    /// No valid identity accompanied the request.
    #[error("authentication required")]
    Unauthenticated,

    /// Valid identity, but the role or ticket pairing forbids the action.
    #[error("not authorized: {0}")]
    Unauthorized(String),

    /// The action is not defined for the ticket's current status.
    #[error("cannot {action} while ticket is {from}")]
    InvalidTransition { from: Status, action: ActionKind },

    /// Unknown ticket id.
    #[error("ticket not found: {0}")]
    NotFound(TicketId),

    /// Request input failed validation.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// Another request modified the ticket first.
    #[error("ticket {0} was modified by another request")]
    Conflict(TicketId),

    /// The ticket store failed.
    #[error("store error: {0}")]
    Store(String),

    /// The classifier failed.
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

impl TicketError {
    /// Stable machine-readable name for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            TicketError::Unauthenticated => "unauthenticated",
            TicketError::Unauthorized(_) => "unauthorized",
            TicketError::InvalidTransition { .. } => "invalid_transition",
            TicketError::NotFound(_) => "not_found",
            TicketError::Invalid(_) => "invalid",
            TicketError::Conflict(_) => "conflict",
            TicketError::Store(_) => "store",
            TicketError::Classifier(_) => "classifier",
        }
    }

    /// Shorthand for [`TicketError::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        TicketError::Unauthorized(message.into())
    }
}

impl From<ValidationError> for TicketError {
    fn from(err: ValidationError) -> Self {
        TicketError::Invalid(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_message() {
        let err = TicketError::InvalidTransition {
            from: Status::Closed,
            action: ActionKind::Reject,
        };
        assert_eq!(err.to_string(), "cannot reject while ticket is Closed");
        assert_eq!(err.kind(), "invalid_transition");
    }

    #[test]
    fn test_validation_error_maps_to_invalid() {
        let err: TicketError = ValidationError::Empty("description".to_string()).into();
        assert!(matches!(err, TicketError::Invalid(_)));
        assert_eq!(err.to_string(), "invalid input: description cannot be empty");
    }
}
