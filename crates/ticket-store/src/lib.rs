//! Ticket and attachment storage for LandTena.
//!
//! This crate owns every ticket record. It provides the [`TicketStore`]
//! trait with two backends:
//!
//! - [`MemoryTicketStore`] - in-process map, the default
//! - [`SqliteTicketStore`] - SQLite via SQLx, for runs that should survive restarts
//!
//! and the [`AttachmentStore`] trait with [`MemoryAttachmentStore`].
//!
//! Writes go through [`TicketStore::replace`], which only succeeds when the
//! stored version still matches the version the caller read. Two requests
//! acting on the same ticket can therefore never silently overwrite each
//! other.
//!
//! # Example
//!
//! ```no_run
//! use ticket_store::{SqliteTicketStore, TicketStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let store = SqliteTicketStore::connect("sqlite:landtena.db?mode=rwc").await?;
//!     store.migrate().await?;
//!
//!     for ticket in store.list().await? {
//!         println!("#{} {}", ticket.id, ticket.status);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod attachment;
pub mod error;
pub mod memory;
pub mod models;
pub mod sqlite;

pub use attachment::{Attachment, AttachmentStore, MemoryAttachmentStore, DEFAULT_MAX_ATTACHMENT_BYTES};
pub use error::{Result, StoreError};
pub use memory::MemoryTicketStore;
pub use sqlite::SqliteTicketStore;

use async_trait::async_trait;
use ticket_core::{Ticket, TicketId};

/// Storage for ticket records.
///
/// Implementations must keep insertion order for [`TicketStore::list`] and
/// must apply [`TicketStore::replace`] atomically.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Insert a new ticket. Fails with `AlreadyExists` on a duplicate id.
    async fn insert(&self, ticket: &Ticket) -> Result<()>;

    /// Fetch a snapshot of one ticket.
    async fn get(&self, id: &TicketId) -> Result<Ticket>;

    /// Snapshot of every ticket, oldest first.
    async fn list(&self) -> Result<Vec<Ticket>>;

    /// Overwrite a ticket if its stored version equals `expected_version`.
    ///
    /// On mismatch nothing is written and `VersionConflict` is returned.
    async fn replace(&self, ticket: &Ticket, expected_version: u64) -> Result<()>;

    /// Get a human-readable name for this backend.
    fn name(&self) -> &str;
}

pub(crate) fn not_found(id: &TicketId) -> StoreError {
    StoreError::NotFound {
        entity: "Ticket",
        id: id.to_string(),
    }
}
