//! Store error types.

use thiserror::Error;
use ticket_core::{TicketError, TicketId};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Stored record could not be (de)serialized
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Record already exists
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// Stored version differs from the one the caller read
    #[error("version conflict on {id}: expected {expected}, found {found}")]
    VersionConflict { id: String, expected: u64, found: u64 },

    /// Attachment exceeds the configured size limit
    #[error("attachment too large ({size} bytes, max {max})")]
    TooLarge { size: usize, max: usize },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for TicketError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity: "Ticket", id } => TicketError::NotFound(TicketId::from(id)),
            StoreError::NotFound { entity, id } => {
                TicketError::Invalid(format!("unknown {}: {}", entity.to_lowercase(), id))
            }
            StoreError::VersionConflict { id, .. } => TicketError::Conflict(TicketId::from(id)),
            too_large @ StoreError::TooLarge { .. } => TicketError::Invalid(too_large.to_string()),
            other => TicketError::Store(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_not_found_maps_to_not_found() {
        let err: TicketError = StoreError::NotFound {
            entity: "Ticket",
            id: "abc".to_string(),
        }
        .into();
        assert!(matches!(err, TicketError::NotFound(id) if id.as_str() == "abc"));
    }

    #[test]
    fn test_unknown_attachment_maps_to_invalid() {
        let err: TicketError = StoreError::NotFound {
            entity: "Attachment",
            id: "m-1".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "invalid input: unknown attachment: m-1");
    }

    #[test]
    fn test_version_conflict_maps_to_conflict() {
        let err: TicketError = StoreError::VersionConflict {
            id: "abc".to_string(),
            expected: 2,
            found: 3,
        }
        .into();
        assert!(matches!(err, TicketError::Conflict(_)));
    }
}
