//! Core trait and types for the LandTena maintenance ticket tracker.
//!
//! This crate provides the shared vocabulary used by every other crate in
//! the workspace. It defines:
//!
//! - [`Ticket`] - The central record, with its [`Status`] and audit trail
//! - [`TicketAction`] / [`ActionKind`] - Role-specific lifecycle actions
//! - [`Classifier`] - The trait every ticket classifier implements
//! - [`Role`], [`Identity`], [`Actor`] - Who is acting on a ticket
//! - [`RoleResolver`] - Maps a verified identity to a role
//! - [`TicketError`] - The error taxonomy surfaced at the request boundary
//!
//! # Example
//!
//! ```rust
//! use ticket_core::{async_trait, Classification, Classifier, ClassifierError, IssueType};
//!
//! struct AlwaysPlumbing;
//!
//! #[async_trait]
//! impl Classifier for AlwaysPlumbing {
//!     async fn classify(&self, description: &str) -> Result<Classification, ClassifierError> {
//!         let mut classification = Classification::fallback(description);
//!         classification.issue_type = IssueType::Plumbing;
//!         Ok(classification)
//!     }
//!
//!     fn name(&self) -> &str {
//!         "AlwaysPlumbing"
//!     }
//! }
//! ```

mod action;
mod classification;
mod error;
mod role;
mod ticket;
mod trait_def;
pub mod validation;

pub use action::{ActionKind, TicketAction};
pub use classification::{Classification, IssueType, Tone, Urgency, SUMMARY_PREFIX_CHARS};
pub use error::{ClassifierError, TicketError};
pub use role::{
    Actor, DirectoryError, DirectoryRoleResolver, DomainRoleResolver, Identity, Role,
    RoleResolver,
};
pub use ticket::{
    same_email, MediaKind, MediaRef, NewTicket, TenantReply, Ticket, TicketId, UpdateEntry,
    UpdateKind, Status,
};
pub use trait_def::Classifier;
pub use validation::ValidationError;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
