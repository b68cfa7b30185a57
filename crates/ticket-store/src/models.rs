//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ticket_core::Ticket;

use crate::error::Result;

/// A row of the `tickets` table.
///
/// The full record lives in `data` as JSON. The remaining columns are
/// projections kept for indexing and the optimistic version check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TicketRow {
    /// Ticket id.
    pub id: String,
    /// Optimistic concurrency token.
    pub version: i64,
    /// Status display label.
    pub status: String,
    /// Submitting tenant.
    pub created_by: String,
    /// Responsible landlord, if any.
    pub assigned_to: Option<String>,
    /// Assigned contractor, if any.
    pub contractor_email: Option<String>,
    /// Serialized [`Ticket`].
    pub data: String,
}

impl TicketRow {
    pub fn from_ticket(ticket: &Ticket) -> Result<Self> {
        Ok(Self {
            id: ticket.id.to_string(),
            version: ticket.version as i64,
            status: ticket.status.as_str().to_string(),
            created_by: ticket.created_by.clone(),
            assigned_to: ticket.assigned_to.clone(),
            contractor_email: ticket.contractor_email.clone(),
            data: serde_json::to_string(ticket)?,
        })
    }

    pub fn into_ticket(self) -> Result<Ticket> {
        Ok(serde_json::from_str(&self.data)?)
    }
}
