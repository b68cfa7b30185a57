//! The ticket lifecycle engine.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ticket_core::validation::{validate_email, validate_task_id, validate_text};
use ticket_core::{
    ActionKind, Actor, Classifier, MediaRef, NewTicket, Role, TenantReply, Ticket,
    TicketAction, TicketError, TicketId, UpdateEntry, UpdateKind,
};
use ticket_store::{AttachmentStore, TicketStore};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::views::{is_visible, TicketView};

/// Landlord that new tickets are routed to unless configured otherwise.
pub const DEFAULT_LANDLORD: &str = "landlord@landlord.com";

/// Applies submissions and transitions to tickets.
///
/// The engine is the only writer of ticket records. Every mutation is
/// checked in a fixed order (role, status, identity, input), applied to a
/// cloned snapshot, and written back with an optimistic version check, so a
/// rejected request never changes the stored record.
pub struct LifecycleEngine {
    store: Arc<dyn TicketStore>,
    attachments: Arc<dyn AttachmentStore>,
    classifier: Arc<dyn Classifier>,
    clock: Arc<dyn Clock>,
    default_landlord: String,
}

impl LifecycleEngine {
    /// Create an engine on the wall clock, routing to [`DEFAULT_LANDLORD`].
    pub fn new(
        store: Arc<dyn TicketStore>,
        attachments: Arc<dyn AttachmentStore>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            store,
            attachments,
            classifier,
            clock: Arc::new(SystemClock),
            default_landlord: DEFAULT_LANDLORD.to_string(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_default_landlord(mut self, landlord: impl Into<String>) -> Self {
        self.default_landlord = landlord.into();
        self
    }

    pub fn default_landlord(&self) -> &str {
        &self.default_landlord
    }

    pub fn store(&self) -> &Arc<dyn TicketStore> {
        &self.store
    }

    pub fn attachments(&self) -> &Arc<dyn AttachmentStore> {
        &self.attachments
    }

    /// Submit a new ticket on behalf of a tenant.
    pub async fn submit(&self, actor: &Actor, new_ticket: NewTicket) -> Result<Ticket, TicketError> {
        if actor.role != Role::Tenant {
            warn!(role = %actor.role, "Rejected submission from non-tenant");
            return Err(TicketError::unauthorized(format!(
                "only tenants can submit tickets, not a {}",
                actor.role
            )));
        }

        validate_text("description", &new_ticket.description)?;
        let description = new_ticket.description.trim().to_string();
        let media = self.resolve_media(&new_ticket.media).await?;

        let classification = self.classifier.classify(&description).await?;
        debug!(
            classifier = self.classifier.name(),
            issue_type = %classification.issue_type,
            urgency = %classification.urgency,
            tone = %classification.tone,
            "Classified ticket"
        );

        let ticket = Ticket::submitted(
            TicketId::generate(),
            actor.email(),
            description,
            classification,
            media,
            Some(self.default_landlord.clone()),
            self.clock.now(),
        );

        self.store.insert(&ticket).await?;

        info!(
            ticket_id = %ticket.id,
            created_by = %ticket.created_by,
            issue_type = %ticket.issue_type,
            "Ticket submitted"
        );

        Ok(ticket)
    }

    /// Apply a lifecycle action to a ticket and return the updated record.
    pub async fn apply(
        &self,
        actor: &Actor,
        id: &TicketId,
        action: TicketAction,
    ) -> Result<Ticket, TicketError> {
        let current = self.store.get(id).await?;
        let kind = action.kind();

        if let Err(e) = authorize(actor, &current, kind) {
            warn!(
                ticket_id = %id,
                action = ?kind,
                role = %actor.role,
                status = %current.status,
                "Rejected action: {}", e
            );
            return Err(e);
        }

        let mut next = current.clone();
        let now = self.timestamp_for(&current);
        let update = match action {
            TicketAction::AssignContractor {
                contractor_email,
                task_id,
            } => {
                let contractor_email = contractor_email.trim().to_string();
                validate_email(&contractor_email)?;
                let task_id = task_id
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty());
                if let Some(task_id) = &task_id {
                    validate_task_id(task_id)?;
                }

                next.contractor_email = Some(contractor_email);
                next.task_id = task_id;
                next.assigned_to = Some(actor.email().to_string());
                UpdateKind::ContractorAssigned
            }
            TicketAction::RequestInfo => {
                next.assigned_to = Some(actor.email().to_string());
                UpdateKind::InfoRequested
            }
            TicketAction::SupplyInfo { text, media } => {
                validate_text("additional details", &text)?;
                let media = self.resolve_media(&media).await?;
                next.replies.push(TenantReply {
                    text: text.trim().to_string(),
                    media,
                    timestamp: now,
                });
                UpdateKind::InfoSupplied
            }
            TicketAction::MarkResolved => UpdateKind::Resolved,
            TicketAction::Confirm => UpdateKind::Confirmed,
            TicketAction::Reject => UpdateKind::Reopened,
        };

        next.status = kind.target();
        next.updates.push(UpdateEntry::new(update, actor.email(), now));
        next.version = current.version + 1;

        self.store.replace(&next, current.version).await?;

        info!(
            ticket_id = %id,
            action = ?kind,
            role = %actor.role,
            from = %current.status,
            to = %next.status,
            "Ticket transitioned"
        );

        Ok(next)
    }

    /// Fetch a ticket the actor is allowed to see.
    pub async fn get(&self, actor: &Actor, id: &TicketId) -> Result<Ticket, TicketError> {
        let ticket = self.store.get(id).await?;
        if !is_visible(actor, &ticket) {
            return Err(TicketError::unauthorized(format!(
                "ticket {} is not visible to {}",
                id,
                actor.email()
            )));
        }
        Ok(ticket)
    }

    /// Every ticket visible to the actor, in submission order.
    pub async fn visible_tickets(&self, actor: &Actor) -> Result<Vec<Ticket>, TicketError> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|ticket| is_visible(actor, ticket))
            .collect())
    }

    /// Presentation view of one visible ticket.
    pub async fn view(&self, actor: &Actor, id: &TicketId) -> Result<TicketView, TicketError> {
        Ok(TicketView::new(actor, self.get(actor, id).await?))
    }

    /// Presentation views of every ticket visible to the actor.
    pub async fn views(&self, actor: &Actor) -> Result<Vec<TicketView>, TicketError> {
        Ok(self
            .visible_tickets(actor)
            .await?
            .into_iter()
            .map(|ticket| TicketView::new(actor, ticket))
            .collect())
    }

    /// Look up attachment ids, failing on the first unknown one.
    async fn resolve_media(&self, ids: &[String]) -> Result<Vec<MediaRef>, TicketError> {
        let mut media = Vec::with_capacity(ids.len());
        for id in ids {
            media.push(self.attachments.media_ref(id.trim()).await?);
        }
        Ok(media)
    }

    /// Current time, never earlier than the ticket's last update.
    fn timestamp_for(&self, ticket: &Ticket) -> DateTime<Utc> {
        let now = self.clock.now();
        match ticket.last_update_at() {
            Some(last) if last > now => last,
            _ => now,
        }
    }
}

/// Check whether `actor` may perform `kind` on `ticket` right now.
///
/// Gates run in order: role, then status, then identity.
pub fn authorize(actor: &Actor, ticket: &Ticket, kind: ActionKind) -> Result<(), TicketError> {
    if actor.role != kind.role() {
        return Err(TicketError::unauthorized(format!(
            "a {} cannot {}",
            actor.role, kind
        )));
    }

    if !kind.allowed_for(ticket) {
        return Err(TicketError::InvalidTransition {
            from: ticket.status,
            action: kind,
        });
    }

    let email = actor.email();
    let owns = match actor.role {
        Role::Tenant => ticket.is_created_by(email),
        Role::Contractor => ticket.is_contractor(email),
        Role::Landlord => ticket.is_assigned_to(email) || ticket.status.is_pending(),
    };

    if !owns {
        return Err(TicketError::unauthorized(format!(
            "{} cannot {} on ticket {}",
            email, kind, ticket.id
        )));
    }

    Ok(())
}

/// The action kinds `actor` may perform on `ticket` in its current status.
pub fn permitted_actions(actor: &Actor, ticket: &Ticket) -> Vec<ActionKind> {
    ActionKind::ALL
        .into_iter()
        .filter(|kind| authorize(actor, ticket, *kind).is_ok())
        .collect()
}
