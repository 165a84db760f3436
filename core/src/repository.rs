//! Persistence seams consumed by the services.
//!
//! `CivicStore` implements all three; tests wrap it to inject failures.

use crate::{
    complaint::Complaint,
    error::CivicResult,
    event::NotificationRecord,
    types::{Category, Role, Status, UserId},
    user::User,
};

/// Conjunctive filter over complaints. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplaintFilter {
    pub status:       Option<Status>,
    pub status_not:   Option<Status>,
    pub category:     Option<Category>,
    pub owner:        Option<UserId>,
    pub is_escalated: Option<bool>,
}

impl ComplaintFilter {
    /// Unresolved and not yet escalated: what the escalation scanner sweeps.
    pub fn escalation_candidates() -> Self {
        Self {
            status_not: Some(Status::Resolved),
            is_escalated: Some(false),
            ..Self::default()
        }
    }

    pub fn owned_by(owner: impl Into<UserId>) -> Self {
        Self { owner: Some(owner.into()), ..Self::default() }
    }
}

pub trait ComplaintRepository: Send + Sync {
    fn insert_complaint(&self, complaint: &Complaint) -> CivicResult<()>;

    fn find_complaint(&self, id: &str) -> CivicResult<Option<Complaint>>;

    /// Newest first.
    fn find_complaints(&self, filter: &ComplaintFilter) -> CivicResult<Vec<Complaint>>;

    /// Persist the mutable fields of `complaint`, provided nobody else saved
    /// it since it was read (`version` must match). Returns the stored copy
    /// with its bumped version.
    fn save_complaint(&self, complaint: &Complaint) -> CivicResult<Complaint>;
}

pub trait UserDirectory: Send + Sync {
    fn insert_user(&self, user: &User) -> CivicResult<()>;

    fn find_user(&self, id: &str) -> CivicResult<Option<User>>;

    fn find_user_by_email(&self, email: &str) -> CivicResult<Option<User>>;

    fn find_users_by_role(&self, role: Role) -> CivicResult<Vec<User>>;

    /// Oldest first.
    fn find_all_users(&self) -> CivicResult<Vec<User>>;
}

pub trait NotificationInbox: Send + Sync {
    fn insert_notification(&self, record: &NotificationRecord) -> CivicResult<()>;

    fn find_notification(&self, id: &str) -> CivicResult<Option<NotificationRecord>>;

    /// Newest first.
    fn notifications_for(&self, recipient: &str) -> CivicResult<Vec<NotificationRecord>>;

    fn mark_notification_read(&self, id: &str) -> CivicResult<()>;

    /// Returns how many unread notifications were flipped.
    fn mark_all_notifications_read(&self, recipient: &str) -> CivicResult<usize>;
}
