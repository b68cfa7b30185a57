//! The ticket record and its audit trail.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classification::{Classification, IssueType, Tone, Urgency};

/// Opaque ticket identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TicketId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TicketId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Submitted")]
    Submitted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Awaiting Tenant Info")]
    AwaitingTenantInfo,
    #[serde(rename = "Resolved")]
    Resolved,
    #[serde(rename = "Reopened")]
    Reopened,
    #[serde(rename = "Closed")]
    Closed,
}

impl Status {
    /// Display label, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Submitted => "Submitted",
            Status::InProgress => "In Progress",
            Status::AwaitingTenantInfo => "Awaiting Tenant Info",
            Status::Resolved => "Resolved",
            Status::Reopened => "Reopened",
            Status::Closed => "Closed",
        }
    }

    /// Waiting on landlord triage. Reopened tickets re-enter triage.
    pub fn is_pending(&self) -> bool {
        matches!(self, Status::Submitted | Status::Reopened)
    }

    /// No transition leaves this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Closed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of audit-trail entry. Each kind carries fixed event text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    Submitted,
    ContractorAssigned,
    InfoRequested,
    InfoSupplied,
    Resolved,
    Confirmed,
    Reopened,
}

impl UpdateKind {
    /// Human-readable event text recorded in the audit trail.
    pub fn event(&self) -> &'static str {
        match self {
            UpdateKind::Submitted => "SmartTicket submitted",
            UpdateKind::ContractorAssigned => "Landlord assigned contractor",
            UpdateKind::InfoRequested => "Landlord requested more info from tenant",
            UpdateKind::InfoSupplied => "Tenant supplied more info",
            UpdateKind::Resolved => "Contractor marked issue resolved",
            UpdateKind::Confirmed => "Tenant confirmed issue resolved",
            UpdateKind::Reopened => "Tenant reopened ticket",
        }
    }
}

/// One entry in a ticket's append-only audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEntry {
    pub kind: UpdateKind,
    pub event: String,
    /// Email of the caller who triggered the entry.
    pub actor: String,
    pub timestamp: DateTime<Utc>,
}

impl UpdateEntry {
    pub fn new(kind: UpdateKind, actor: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            event: kind.event().to_string(),
            actor: actor.into(),
            timestamp,
        }
    }
}

/// Coarse media-type tag used for display routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    /// Classify by content-type prefix (`image/*`, `video/*`).
    pub fn from_content_type(content_type: &str) -> Self {
        let content_type = content_type.trim().to_ascii_lowercase();
        if content_type.starts_with("image/") {
            MediaKind::Image
        } else if content_type.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }
}

/// Stable reference to an uploaded attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub kind: MediaKind,
    pub size: u64,
}

/// Additional details supplied by a tenant after a landlord asked for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantReply {
    pub text: String,
    #[serde(default)]
    pub media: Vec<MediaRef>,
    pub timestamp: DateTime<Utc>,
}

/// Tenant submission payload. `media` holds attachment ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    pub description: String,
    #[serde(default)]
    pub media: Vec<String>,
}

/// A maintenance ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub created_by: String,
    pub description: String,
    pub summary: String,
    pub recommended_action: String,
    pub issue_type: IssueType,
    pub urgency: Urgency,
    pub tone: Tone,
    pub status: Status,
    pub assigned_to: Option<String>,
    pub contractor_email: Option<String>,
    pub task_id: Option<String>,
    #[serde(default)]
    pub replies: Vec<TenantReply>,
    pub updates: Vec<UpdateEntry>,
    #[serde(default)]
    pub media: Vec<MediaRef>,
    pub submitted_at: DateTime<Utc>,
    /// Optimistic concurrency token, bumped on every transition.
    pub version: u64,
}

impl Ticket {
    /// Build a freshly submitted ticket.
    ///
    /// The ticket starts in [`Status::Submitted`] with a single
    /// [`UpdateKind::Submitted`] entry stamped `now`.
    pub fn submitted(
        id: TicketId,
        created_by: impl Into<String>,
        description: impl Into<String>,
        classification: Classification,
        media: Vec<MediaRef>,
        assigned_to: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let created_by = created_by.into();
        let updates = vec![UpdateEntry::new(UpdateKind::Submitted, created_by.clone(), now)];

        Self {
            id,
            created_by,
            description: description.into(),
            summary: classification.summary,
            recommended_action: classification.recommendation,
            issue_type: classification.issue_type,
            urgency: classification.urgency,
            tone: classification.tone,
            status: Status::Submitted,
            assigned_to,
            contractor_email: None,
            task_id: None,
            replies: Vec::new(),
            updates,
            media,
            submitted_at: now,
            version: 1,
        }
    }

    /// True exactly when the ticket is closed.
    pub fn closed(&self) -> bool {
        self.status == Status::Closed
    }

    /// True once a contractor has marked the ticket resolved at least once.
    pub fn resolved(&self) -> bool {
        self.has_update(UpdateKind::Resolved)
    }

    /// True once the tenant has rejected a resolution at least once.
    pub fn reopened(&self) -> bool {
        self.has_update(UpdateKind::Reopened)
    }

    /// Urgent or frustrated tickets get flagged in triage lists.
    pub fn needs_attention(&self) -> bool {
        self.urgency == Urgency::High || self.tone == Tone::Frustrated
    }

    pub fn has_update(&self, kind: UpdateKind) -> bool {
        self.updates.iter().any(|u| u.kind == kind)
    }

    /// Timestamp of the latest audit entry.
    pub fn last_update_at(&self) -> Option<DateTime<Utc>> {
        self.updates.last().map(|u| u.timestamp)
    }

    pub fn is_created_by(&self, email: &str) -> bool {
        same_email(&self.created_by, email)
    }

    pub fn is_assigned_to(&self, email: &str) -> bool {
        self.assigned_to
            .as_deref()
            .is_some_and(|assigned| same_email(assigned, email))
    }

    pub fn is_contractor(&self, email: &str) -> bool {
        self.contractor_email
            .as_deref()
            .is_some_and(|contractor| same_email(contractor, email))
    }
}

/// Case-insensitive email comparison, ignoring surrounding whitespace.
pub fn same_email(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
