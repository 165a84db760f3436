//! Status transitions driven by administrators.
//!
//! STATE MACHINE:
//!   pending ⇄ in_progress → resolved
//!   pending ────────────→ resolved
//!   resolved is terminal; any further change is an IllegalTransition.
//!
//! The owner is notified after the write is committed. Notification outcome
//! never changes the result of `set_status`.

use crate::{
    clock::Clock,
    complaint::Complaint,
    error::{CivicError, CivicResult},
    event::LifecycleEvent,
    notification::{DeliveryReport, NotificationService, Recipient},
    repository::{ComplaintRepository, UserDirectory},
    types::{Actor, Status},
};
use std::sync::Arc;

/// Result of a successful status change.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub complaint: Complaint,
    pub delivery:  DeliveryReport,
}

pub struct StatusService {
    complaints: Arc<dyn ComplaintRepository>,
    users:      Arc<dyn UserDirectory>,
    notifier:   Arc<NotificationService>,
    clock:      Arc<dyn Clock>,
}

impl StatusService {
    pub fn new(
        complaints: Arc<dyn ComplaintRepository>,
        users: Arc<dyn UserDirectory>,
        notifier: Arc<NotificationService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { complaints, users, notifier, clock }
    }

    /// Move complaint `id` to `new_status` (raw label, validated here).
    pub fn set_status(&self, id: &str, new_status: &str, actor: &Actor) -> CivicResult<StatusChange> {
        if !actor.is_admin() {
            return Err(CivicError::Unauthorized { action: "change complaint status" });
        }
        let to: Status = new_status
            .parse()
            .map_err(|_| CivicError::InvalidStatus { value: new_status.to_string() })?;

        let mut complaint = self
            .complaints
            .find_complaint(id)?
            .ok_or_else(|| CivicError::not_found("Complaint", id))?;
        let from = complaint.status;

        complaint.apply_status(to, self.clock.now())?;
        let saved = self.complaints.save_complaint(&complaint)?;
        log::info!("Complaint {id}: {from} -> {to} by {}", actor.user_id);

        let event = LifecycleEvent::ComplaintUpdate {
            complaint_id: saved.id.clone(),
            new_status: to,
            title: saved.title.clone(),
        };
        let delivery = self.notifier.notify(&self.owner_recipient(&saved), &event);

        Ok(StatusChange { complaint: saved, delivery })
    }

    /// Contact details for the complaint owner. A failed or empty lookup
    /// degrades to id-only routing; it never fails the status change.
    fn owner_recipient(&self, complaint: &Complaint) -> Recipient {
        match self.users.find_user(&complaint.owner) {
            Ok(Some(user)) => Recipient::from(&user),
            Ok(None) => {
                log::warn!("Owner {} of complaint {} not in directory", complaint.owner, complaint.id);
                Recipient::id_only(complaint.owner.clone())
            }
            Err(e) => {
                log::error!("Owner lookup failed for complaint {}: {e}", complaint.id);
                Recipient::id_only(complaint.owner.clone())
            }
        }
    }
}
