//! Lifecycle events and the inbox records they produce.
//!
//! RULE: every notification starts as a `LifecycleEvent`. Channels
//! pattern-match on the variant; nothing inspects loose payload maps.

use crate::types::{ComplaintId, EntityId, Status, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// An administrator moved a complaint to a new status.
    ComplaintUpdate {
        complaint_id: ComplaintId,
        new_status:   Status,
        title:        String,
    },
    /// The escalation scanner flagged an SLA breach.
    Escalation {
        complaint_id: ComplaintId,
        title:        String,
    },
    System {
        title:   String,
        message: String,
    },
}

impl LifecycleEvent {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::ComplaintUpdate { .. } => NotificationKind::ComplaintUpdate,
            Self::Escalation { .. }      => NotificationKind::Alert,
            Self::System { .. }          => NotificationKind::System,
        }
    }

    pub fn headline(&self) -> String {
        match self {
            Self::ComplaintUpdate { .. } => "Complaint Updated".to_string(),
            Self::Escalation { .. }      => "SLA Breach Escalation".to_string(),
            Self::System { title, .. }   => title.clone(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::ComplaintUpdate { new_status, title, .. } => {
                format!("Your complaint \"{title}\" is now {}.", new_status.label())
            }
            Self::Escalation { complaint_id, title } => {
                format!("Complaint #{complaint_id} ({title}) has breached SLA!")
            }
            Self::System { message, .. } => message.clone(),
        }
    }

    pub fn complaint_id(&self) -> Option<&ComplaintId> {
        match self {
            Self::ComplaintUpdate { complaint_id, .. } | Self::Escalation { complaint_id, .. } => {
                Some(complaint_id)
            }
            Self::System { .. } => None,
        }
    }

    /// The real-time payload pushed to a connected client.
    pub fn to_push(&self) -> PushMessage {
        PushMessage {
            kind:         self.kind(),
            title:        self.headline(),
            message:      self.message(),
            complaint_id: self.complaint_id().cloned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    System,
    ComplaintUpdate,
    Alert,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System          => "system",
            Self::ComplaintUpdate => "complaint_update",
            Self::Alert           => "alert",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system"           => Ok(Self::System),
            "complaint_update" => Ok(Self::ComplaintUpdate),
            "alert"            => Ok(Self::Alert),
            _ => Err(()),
        }
    }
}

/// Wire shape of a real-time push, routed by recipient id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    #[serde(rename = "type")]
    pub kind:         NotificationKind,
    pub title:        String,
    pub message:      String,
    #[serde(rename = "complaintId", default, skip_serializing_if = "Option::is_none")]
    pub complaint_id: Option<ComplaintId>,
}

/// A notification persisted to a recipient's inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id:                   EntityId,
    pub recipient:            UserId,
    pub kind:                 NotificationKind,
    pub title:                String,
    pub message:              String,
    pub related_complaint_id: Option<ComplaintId>,
    pub is_read:              bool,
    pub created_at:           DateTime<Utc>,
}
