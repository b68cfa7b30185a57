//! Ticket lifecycle engine and role views.
//!
//! [`LifecycleEngine`] is the single writer of ticket records. It accepts
//! tenant submissions, runs the classifier, and applies lifecycle actions:
//!
//! ```text
//! Submitted | Reopened  --assign contractor-->  In Progress
//! Submitted | Reopened | In Progress  --request info-->  Awaiting Tenant Info
//! Awaiting Tenant Info  --supply info-->  In Progress
//! In Progress  --mark resolved-->  Resolved
//! Resolved  --confirm-->  Closed
//! Resolved  --reject-->  Reopened
//! ```
//!
//! Role views decide which tickets an actor sees and project each one into a
//! [`TicketView`] carrying the actions that actor may take.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use keyword_classifier::KeywordClassifier;
//! use lifecycle::LifecycleEngine;
//! use ticket_core::{Actor, NewTicket, TicketAction};
//! use ticket_store::{MemoryAttachmentStore, MemoryTicketStore};
//!
//! # async fn example() -> Result<(), ticket_core::TicketError> {
//! let engine = LifecycleEngine::new(
//!     Arc::new(MemoryTicketStore::new()),
//!     Arc::new(MemoryAttachmentStore::new()),
//!     Arc::new(KeywordClassifier::new()),
//! );
//!
//! let ticket = engine
//!     .submit(&Actor::tenant("a@t.com"), NewTicket {
//!         description: "The sink is leaking".to_string(),
//!         media: Vec::new(),
//!     })
//!     .await?;
//!
//! engine
//!     .apply(
//!         &Actor::landlord("landlord@landlord.com"),
//!         &ticket.id,
//!         TicketAction::assign("fix@contractor.com"),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod clock;
mod engine;
mod views;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{authorize, permitted_actions, LifecycleEngine, DEFAULT_LANDLORD};
pub use views::{is_visible, ActionOption, TicketView};
