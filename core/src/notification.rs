//! Notification fan-out.
//!
//! One lifecycle event → inbox record + push + email + SMS, per recipient.
//!
//! RULES:
//!   - Every channel is attempted regardless of what happened on the others.
//!   - Nothing here returns an error. Failures are logged and reported in the
//!     `DeliveryReport`; the operation that triggered the event has already
//!     succeeded by the time we get here.
//!   - At most one attempt per channel per event. No retries, no queue.

use crate::{
    clock::Clock,
    config::NotificationConfig,
    event::{LifecycleEvent, NotificationRecord},
    push::{PushChannel, PushOutcome},
    repository::NotificationInbox,
    transport::{EmailTransport, SmsTransport},
    types::{new_id, UserId},
    user::User,
};
use std::sync::Arc;

/// Where a notification can be routed for one person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub user_id: UserId,
    pub email:   Option<String>,
    pub phone:   Option<String>,
}

impl Recipient {
    /// Reachable only by id (push and inbox); used when the directory
    /// lookup for contact details came back empty.
    pub fn id_only(user_id: impl Into<UserId>) -> Self {
        Self { user_id: user_id.into(), email: None, phone: None }
    }
}

impl From<&User> for Recipient {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            email: Some(user.email.clone()).filter(|e| !e.is_empty()),
            phone: user.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotConnected,
    NoAddress,
    Disabled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelResult {
    Delivered,
    Skipped(SkipReason),
    Failed(String),
}

impl ChannelResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReport {
    pub recipient: UserId,
    pub inbox:     ChannelResult,
    pub push:      ChannelResult,
    pub email:     ChannelResult,
    pub sms:       ChannelResult,
}

impl DeliveryReport {
    pub fn failure_count(&self) -> usize {
        [&self.inbox, &self.push, &self.email, &self.sms]
            .into_iter()
            .filter(|r| r.is_failed())
            .count()
    }
}

pub struct NotificationService {
    inbox:  Arc<dyn NotificationInbox>,
    push:   Arc<dyn PushChannel>,
    email:  Arc<dyn EmailTransport>,
    sms:    Arc<dyn SmsTransport>,
    clock:  Arc<dyn Clock>,
    config: NotificationConfig,
}

impl NotificationService {
    pub fn new(
        inbox: Arc<dyn NotificationInbox>,
        push: Arc<dyn PushChannel>,
        email: Arc<dyn EmailTransport>,
        sms: Arc<dyn SmsTransport>,
        clock: Arc<dyn Clock>,
        config: NotificationConfig,
    ) -> Self {
        Self { inbox, push, email, sms, clock, config }
    }

    /// Deliver `event` to a single recipient on every channel.
    pub fn notify(&self, recipient: &Recipient, event: &LifecycleEvent) -> DeliveryReport {
        let to = &recipient.user_id;
        log::debug!("notify: {} → {to}", event.kind().as_str());

        let report = DeliveryReport {
            recipient: to.clone(),
            inbox: self.record(recipient, event),
            push: self.send_push(recipient, event),
            email: self.send_email(recipient, event),
            sms: self.send_sms(recipient, event),
        };
        if report.failure_count() > 0 {
            log::warn!(
                "notify: {} of 4 channels failed for {to} ({})",
                report.failure_count(),
                event.kind().as_str(),
            );
        }
        report
    }

    /// Deliver the same event to every recipient, independently.
    pub fn broadcast(&self, recipients: &[Recipient], event: &LifecycleEvent) -> Vec<DeliveryReport> {
        recipients.iter().map(|r| self.notify(r, event)).collect()
    }

    fn record(&self, recipient: &Recipient, event: &LifecycleEvent) -> ChannelResult {
        let record = NotificationRecord {
            id: new_id(),
            recipient: recipient.user_id.clone(),
            kind: event.kind(),
            title: event.headline(),
            message: event.message(),
            related_complaint_id: event.complaint_id().cloned(),
            is_read: false,
            created_at: self.clock.now(),
        };
        match self.inbox.insert_notification(&record) {
            Ok(()) => ChannelResult::Delivered,
            Err(e) => {
                log::error!("inbox: failed to store notification for {}: {e}", recipient.user_id);
                ChannelResult::Failed(e.to_string())
            }
        }
    }

    fn send_push(&self, recipient: &Recipient, event: &LifecycleEvent) -> ChannelResult {
        match self.push.push(&recipient.user_id, &event.to_push()) {
            Ok(PushOutcome::Sent(_)) => ChannelResult::Delivered,
            Ok(PushOutcome::NotConnected) => ChannelResult::Skipped(SkipReason::NotConnected),
            Err(e) => {
                log::error!("push: {e}");
                ChannelResult::Failed(e.to_string())
            }
        }
    }

    fn send_email(&self, recipient: &Recipient, event: &LifecycleEvent) -> ChannelResult {
        if !self.config.email_enabled {
            return ChannelResult::Skipped(SkipReason::Disabled);
        }
        let Some(address) = recipient.email.as_deref() else {
            return ChannelResult::Skipped(SkipReason::NoAddress);
        };
        match self.email.send_email(address, &event.headline(), &event.message()) {
            Ok(()) => ChannelResult::Delivered,
            Err(e) => {
                log::error!("email: {e}");
                ChannelResult::Failed(e.to_string())
            }
        }
    }

    fn send_sms(&self, recipient: &Recipient, event: &LifecycleEvent) -> ChannelResult {
        if !self.config.sms_enabled {
            return ChannelResult::Skipped(SkipReason::Disabled);
        }
        let Some(number) = recipient.phone.as_deref() else {
            return ChannelResult::Skipped(SkipReason::NoAddress);
        };
        let body = format!("{}{}", self.config.sms_prefix, event.message());
        match self.sms.send_sms(number, &body) {
            Ok(()) => ChannelResult::Delivered,
            Err(e) => {
                log::error!("sms: {e}");
                ChannelResult::Failed(e.to_string())
            }
        }
    }
}
