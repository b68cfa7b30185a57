//! Role-based visibility and the presentation projection of a ticket.

use serde::Serialize;
use ticket_core::{ActionKind, Actor, Role, Status, Ticket};

use crate::engine::permitted_actions;

/// Whether `actor` may see `ticket` at all.
///
/// - tenants see every ticket they created
/// - landlords see open tickets assigned to them plus every pending one
/// - contractors see open tickets assigned to them
pub fn is_visible(actor: &Actor, ticket: &Ticket) -> bool {
    let email = actor.email();
    match actor.role {
        Role::Tenant => ticket.is_created_by(email),
        Role::Landlord => {
            (ticket.is_assigned_to(email) || ticket.status.is_pending()) && !ticket.closed()
        }
        Role::Contractor => ticket.is_contractor(email) && !ticket.closed(),
    }
}

/// An action the viewer can take, with its button label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionOption {
    pub action: ActionKind,
    pub label: &'static str,
}

impl From<ActionKind> for ActionOption {
    fn from(action: ActionKind) -> Self {
        Self {
            action,
            label: action.label(),
        }
    }
}

/// A ticket as one particular viewer sees it.
#[derive(Debug, Clone, Serialize)]
pub struct TicketView {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub closed: bool,
    pub resolved: bool,
    pub reopened: bool,
    /// Urgent or frustrated; surfaced first in triage.
    pub highlight: bool,
    pub permitted_actions: Vec<ActionOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_note: Option<&'static str>,
}

impl TicketView {
    pub fn new(actor: &Actor, ticket: Ticket) -> Self {
        let permitted_actions = permitted_actions(actor, &ticket)
            .into_iter()
            .map(ActionOption::from)
            .collect();

        Self {
            closed: ticket.closed(),
            resolved: ticket.resolved(),
            reopened: ticket.reopened(),
            highlight: ticket.needs_attention(),
            status_note: status_note(actor.role, &ticket),
            permitted_actions,
            ticket,
        }
    }

    pub fn can(&self, action: ActionKind) -> bool {
        self.permitted_actions.iter().any(|o| o.action == action)
    }
}

fn status_note(role: Role, ticket: &Ticket) -> Option<&'static str> {
    match (role, ticket.status) {
        (Role::Tenant, Status::Submitted) => Some("Your landlord has been notified."),
        (Role::Tenant, Status::AwaitingTenantInfo) => {
            Some("Your landlord asked for more details about this issue.")
        }
        (Role::Tenant, Status::Resolved) => Some("Is your issue fully resolved?"),
        (Role::Tenant, Status::Reopened) => Some("Ticket reopened. Landlord will be notified."),
        (Role::Landlord, Status::AwaitingTenantInfo) => {
            Some("Waiting for tenant's additional details. No further action yet.")
        }
        (Role::Landlord, Status::InProgress) if ticket.contractor_email.is_none() => {
            Some("Tenant supplied more info. Assign a contractor to continue.")
        }
        (Role::Landlord, Status::InProgress) => {
            Some("Contractor assigned and in progress. Check again once contractor resolves.")
        }
        (Role::Landlord, Status::Resolved) => Some("Waiting for tenant to confirm resolution."),
        (Role::Contractor, status) if status != Status::InProgress => {
            Some("Ticket not in progress. No contractor action at this stage.")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ticket_core::{Classification, TicketId, Tone, UpdateEntry, UpdateKind, Urgency};

    fn ticket(status: Status) -> Ticket {
        let mut ticket = Ticket::submitted(
            TicketId::from("t-1"),
            "a@t.com",
            "Leak",
            Classification::fallback("Leak"),
            Vec::new(),
            Some("landlord@example.com".to_string()),
            Utc::now(),
        );
        ticket.status = status;
        ticket
    }

    fn assigned(status: Status) -> Ticket {
        let mut ticket = ticket(status);
        ticket.assigned_to = Some("boss@landlord.com".to_string());
        ticket.contractor_email = Some("fix@contractor.com".to_string());
        ticket
    }

    #[test]
    fn test_submitted_visible_to_tenant_and_any_landlord_only() {
        let ticket = ticket(Status::Submitted);
        assert!(is_visible(&Actor::tenant("a@t.com"), &ticket));
        assert!(is_visible(&Actor::tenant("A@T.com"), &ticket));
        assert!(!is_visible(&Actor::tenant("b@t.com"), &ticket));
        assert!(is_visible(&Actor::landlord("anyone@landlord.com"), &ticket));
        assert!(!is_visible(&Actor::contractor("fix@contractor.com"), &ticket));
    }

    #[test]
    fn test_assigned_ticket_visibility() {
        let ticket = assigned(Status::InProgress);
        assert!(is_visible(&Actor::landlord("boss@landlord.com"), &ticket));
        assert!(!is_visible(&Actor::landlord("other@landlord.com"), &ticket));
        assert!(is_visible(&Actor::contractor("fix@contractor.com"), &ticket));
        assert!(!is_visible(&Actor::contractor("other@contractor.com"), &ticket));
    }

    #[test]
    fn test_reopened_visible_to_every_landlord() {
        let ticket = assigned(Status::Reopened);
        assert!(is_visible(&Actor::landlord("other@landlord.com"), &ticket));
    }

    #[test]
    fn test_closed_hidden_from_staff() {
        let ticket = assigned(Status::Closed);
        assert!(is_visible(&Actor::tenant("a@t.com"), &ticket));
        assert!(!is_visible(&Actor::landlord("boss@landlord.com"), &ticket));
        assert!(!is_visible(&Actor::contractor("fix@contractor.com"), &ticket));
    }

    #[test]
    fn test_view_derives_flags_and_actions() {
        let mut ticket = assigned(Status::Resolved);
        ticket.urgency = Urgency::High;
        ticket.updates.push(UpdateEntry::new(
            UpdateKind::Resolved,
            "fix@contractor.com",
            Utc::now(),
        ));

        let view = TicketView::new(&Actor::tenant("a@t.com"), ticket);
        assert!(view.resolved);
        assert!(!view.closed);
        assert!(view.highlight);
        assert!(view.can(ActionKind::Confirm));
        assert!(view.can(ActionKind::Reject));
        assert!(!view.can(ActionKind::MarkResolved));
        assert_eq!(view.status_note, Some("Is your issue fully resolved?"));
    }

    #[test]
    fn test_view_serializes_flat() {
        let mut ticket = ticket(Status::Submitted);
        ticket.tone = Tone::Frustrated;
        let view = TicketView::new(&Actor::landlord("boss@landlord.com"), ticket);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["id"], "t-1");
        assert_eq!(json["status"], "Submitted");
        assert_eq!(json["highlight"], true);
        assert_eq!(json["permitted_actions"][0]["action"], "assign_contractor");
        assert_eq!(json["permitted_actions"][0]["label"], "Assign to Contractor");
        assert!(json.get("status_note").is_none());
    }

    #[test]
    fn test_unassigned_in_progress_prompts_assignment() {
        let mut ticket = ticket(Status::InProgress);
        ticket.assigned_to = Some("boss@landlord.com".to_string());

        let view = TicketView::new(&Actor::landlord("boss@landlord.com"), ticket);
        assert!(view.can(ActionKind::AssignContractor));
        assert_eq!(
            view.status_note,
            Some("Tenant supplied more info. Assign a contractor to continue.")
        );
    }

    #[test]
    fn test_contractor_note_outside_progress() {
        let view = TicketView::new(
            &Actor::contractor("fix@contractor.com"),
            assigned(Status::AwaitingTenantInfo),
        );
        assert!(view.permitted_actions.is_empty());
        assert_eq!(
            view.status_note,
            Some("Ticket not in progress. No contractor action at this stage.")
        );
    }
}
