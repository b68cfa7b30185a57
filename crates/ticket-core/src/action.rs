//! Lifecycle action types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::role::Role;
use crate::ticket::{Status, Ticket};

/// An action a caller asks the lifecycle engine to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TicketAction {
    /// Landlord hands the ticket to a contractor.
    AssignContractor {
        contractor_email: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        task_id: Option<String>,
    },

    /// Landlord asks the tenant for more details.
    RequestInfo,

    /// Tenant answers a request for more details.
    SupplyInfo {
        text: String,
        /// Attachment ids uploaded alongside the reply.
        #[serde(default)]
        media: Vec<String>,
    },

    /// Contractor reports the work done.
    MarkResolved,

    /// Tenant accepts the resolution.
    Confirm,

    /// Tenant rejects the resolution.
    Reject,
}

impl TicketAction {
    /// Create an assign action without a task id.
    pub fn assign(contractor_email: impl Into<String>) -> Self {
        Self::AssignContractor {
            contractor_email: contractor_email.into(),
            task_id: None,
        }
    }

    /// Create a supply-info action without attachments.
    pub fn supply_info(text: impl Into<String>) -> Self {
        Self::SupplyInfo {
            text: text.into(),
            media: Vec::new(),
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            TicketAction::AssignContractor { .. } => ActionKind::AssignContractor,
            TicketAction::RequestInfo => ActionKind::RequestInfo,
            TicketAction::SupplyInfo { .. } => ActionKind::SupplyInfo,
            TicketAction::MarkResolved => ActionKind::MarkResolved,
            TicketAction::Confirm => ActionKind::Confirm,
            TicketAction::Reject => ActionKind::Reject,
        }
    }
}

/// Payload-free discriminant of [`TicketAction`], used in action menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AssignContractor,
    RequestInfo,
    SupplyInfo,
    MarkResolved,
    Confirm,
    Reject,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::AssignContractor,
        ActionKind::RequestInfo,
        ActionKind::SupplyInfo,
        ActionKind::MarkResolved,
        ActionKind::Confirm,
        ActionKind::Reject,
    ];

    /// The only role that may ever perform this action.
    pub fn role(&self) -> Role {
        match self {
            ActionKind::AssignContractor | ActionKind::RequestInfo => Role::Landlord,
            ActionKind::SupplyInfo | ActionKind::Confirm | ActionKind::Reject => Role::Tenant,
            ActionKind::MarkResolved => Role::Contractor,
        }
    }

    /// Whether the transition table defines this action for `status`.
    pub fn allowed_from(&self, status: Status) -> bool {
        match self {
            ActionKind::AssignContractor => status.is_pending(),
            ActionKind::RequestInfo => status.is_pending() || status == Status::InProgress,
            ActionKind::SupplyInfo => status == Status::AwaitingTenantInfo,
            ActionKind::MarkResolved => status == Status::InProgress,
            ActionKind::Confirm | ActionKind::Reject => status == Status::Resolved,
        }
    }

    /// Whether the action applies to `ticket` as it stands.
    ///
    /// A tenant reply can move a ticket to `InProgress` before any contractor
    /// was assigned. Such a ticket still accepts an assignment.
    pub fn allowed_for(&self, ticket: &Ticket) -> bool {
        match self {
            ActionKind::AssignContractor => {
                self.allowed_from(ticket.status)
                    || (ticket.status == Status::InProgress && ticket.contractor_email.is_none())
            }
            _ => self.allowed_from(ticket.status),
        }
    }

    /// Status the ticket moves to when the action succeeds.
    pub fn target(&self) -> Status {
        match self {
            ActionKind::AssignContractor | ActionKind::SupplyInfo => Status::InProgress,
            ActionKind::RequestInfo => Status::AwaitingTenantInfo,
            ActionKind::MarkResolved => Status::Resolved,
            ActionKind::Confirm => Status::Closed,
            ActionKind::Reject => Status::Reopened,
        }
    }

    /// Button label for the presentation layer.
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::AssignContractor => "Assign to Contractor",
            ActionKind::RequestInfo => "Request More Info from Tenant",
            ActionKind::SupplyInfo => "Send More Info",
            ActionKind::MarkResolved => "Mark as Resolved",
            ActionKind::Confirm => "Confirm Resolution",
            ActionKind::Reject => "Reopen Ticket",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            ActionKind::AssignContractor => "assign a contractor",
            ActionKind::RequestInfo => "request info",
            ActionKind::SupplyInfo => "supply info",
            ActionKind::MarkResolved => "mark resolved",
            ActionKind::Confirm => "confirm",
            ActionKind::Reject => "reject",
        };
        f.write_str(verb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_deserializes_from_tagged_json() {
        let action: TicketAction = serde_json::from_str(
            r#"{"type": "assign_contractor", "contractor_email": "c@x.com"}"#,
        )
        .unwrap();
        assert_eq!(action, TicketAction::assign("c@x.com"));

        let action: TicketAction = serde_json::from_str(r#"{"type": "confirm"}"#).unwrap();
        assert_eq!(action.kind(), ActionKind::Confirm);

        let action: TicketAction =
            serde_json::from_str(r#"{"type": "supply_info", "text": "it's the kitchen"}"#).unwrap();
        assert_eq!(action, TicketAction::supply_info("it's the kitchen"));
    }

    #[test]
    fn test_transition_table() {
        use Status::*;

        assert!(ActionKind::AssignContractor.allowed_from(Submitted));
        assert!(ActionKind::AssignContractor.allowed_from(Reopened));
        assert!(!ActionKind::AssignContractor.allowed_from(InProgress));

        assert!(ActionKind::RequestInfo.allowed_from(Submitted));
        assert!(ActionKind::RequestInfo.allowed_from(InProgress));
        assert!(!ActionKind::RequestInfo.allowed_from(AwaitingTenantInfo));

        assert!(ActionKind::SupplyInfo.allowed_from(AwaitingTenantInfo));
        assert!(ActionKind::MarkResolved.allowed_from(InProgress));
        assert!(ActionKind::Confirm.allowed_from(Resolved));
        assert!(ActionKind::Reject.allowed_from(Resolved));
    }

    #[test]
    fn test_closed_has_no_outbound_transition() {
        assert!(ActionKind::ALL
            .iter()
            .all(|kind| !kind.allowed_from(Status::Closed)));
    }

    #[test]
    fn test_unassigned_in_progress_accepts_assignment() {
        use crate::classification::Classification;
        use chrono::Utc;

        let mut ticket = Ticket::submitted(
            "t-1".into(),
            "a@t.com",
            "leak",
            Classification::fallback("leak"),
            Vec::new(),
            None,
            Utc::now(),
        );
        ticket.status = Status::InProgress;
        assert!(ActionKind::AssignContractor.allowed_for(&ticket));
        assert!(ActionKind::MarkResolved.allowed_for(&ticket));

        ticket.contractor_email = Some("c@contractor.com".to_string());
        assert!(!ActionKind::AssignContractor.allowed_for(&ticket));
        assert!(ActionKind::RequestInfo.allowed_for(&ticket));
    }

    #[test]
    fn test_targets() {
        assert_eq!(ActionKind::AssignContractor.target(), Status::InProgress);
        assert_eq!(ActionKind::RequestInfo.target(), Status::AwaitingTenantInfo);
        assert_eq!(ActionKind::Reject.target(), Status::Reopened);
        assert_eq!(ActionKind::Confirm.target(), Status::Closed);
    }
}
