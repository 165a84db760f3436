//! A recipient's persisted notifications.

use crate::{
    error::{CivicError, CivicResult},
    event::NotificationRecord,
    repository::NotificationInbox,
    types::Actor,
};
use std::sync::Arc;

pub struct InboxService {
    inbox: Arc<dyn NotificationInbox>,
}

impl InboxService {
    pub fn new(inbox: Arc<dyn NotificationInbox>) -> Self {
        Self { inbox }
    }

    /// The actor's notifications, newest first.
    pub fn list(&self, actor: &Actor) -> CivicResult<Vec<NotificationRecord>> {
        self.inbox.notifications_for(&actor.user_id)
    }

    pub fn unread_count(&self, actor: &Actor) -> CivicResult<usize> {
        Ok(self.list(actor)?.iter().filter(|n| !n.is_read).count())
    }

    pub fn mark_read(&self, id: &str, actor: &Actor) -> CivicResult<()> {
        let record = self
            .inbox
            .find_notification(id)?
            .ok_or_else(|| CivicError::not_found("Notification", id))?;
        if record.recipient != actor.user_id {
            return Err(CivicError::Unauthorized { action: "read another user's notification" });
        }
        self.inbox.mark_notification_read(id)
    }

    /// Returns how many notifications changed.
    pub fn mark_all_read(&self, actor: &Actor) -> CivicResult<usize> {
        self.inbox.mark_all_notifications_read(&actor.user_id)
    }
}
