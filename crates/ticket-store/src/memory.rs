//! In-process ticket store.

use async_trait::async_trait;
use indexmap::IndexMap;
use ticket_core::{Ticket, TicketId};
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::{not_found, TicketStore};

/// Tickets held in memory, in insertion order.
///
/// Mutations take the write lock, so a version check and the write that
/// follows it cannot interleave with another request.
#[derive(Debug, Default)]
pub struct MemoryTicketStore {
    tickets: RwLock<IndexMap<TicketId, Ticket>>,
}

impl MemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tickets.
    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn insert(&self, ticket: &Ticket) -> Result<()> {
        let mut tickets = self.tickets.write().await;
        if tickets.contains_key(&ticket.id) {
            return Err(StoreError::AlreadyExists {
                entity: "Ticket",
                id: ticket.id.to_string(),
            });
        }
        tickets.insert(ticket.id.clone(), ticket.clone());
        Ok(())
    }

    async fn get(&self, id: &TicketId) -> Result<Ticket> {
        self.tickets
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn list(&self) -> Result<Vec<Ticket>> {
        Ok(self.tickets.read().await.values().cloned().collect())
    }

    async fn replace(&self, ticket: &Ticket, expected_version: u64) -> Result<()> {
        let mut tickets = self.tickets.write().await;
        let stored = tickets.get_mut(&ticket.id).ok_or_else(|| not_found(&ticket.id))?;

        if stored.version != expected_version {
            return Err(StoreError::VersionConflict {
                id: ticket.id.to_string(),
                expected: expected_version,
                found: stored.version,
            });
        }

        *stored = ticket.clone();
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
