//! Complaint record and its lifecycle invariants.
//!
//! INVARIANTS (enforced by the methods below, never by callers):
//!   - `resolved_at` is Some iff `status == Resolved`.
//!   - `is_escalated` only ever goes false → true.
//!   - `priority` is only raised by the system, never lowered.
//!   - SLA hours, sentiment score and owner are fixed at creation.

use crate::{
    classifier::Classification,
    error::{CivicError, CivicResult},
    priority, sla_policy,
    types::{Category, ComplaintId, Priority, Status, UserId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    pub address: Option<String>,
    pub city:    Option<String>,
    pub state:   Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub rating:  u8,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id:          ComplaintId,
    pub owner:       UserId,
    pub title:       String,
    pub description: String,
    pub category:    Category,
    pub location:    Option<Location>,
    pub coordinates: Option<Coordinates>,
    pub image:       Option<String>,
    pub ai:          Option<Classification>,

    pub status:                    Status,
    pub priority:                  Priority,
    pub expected_resolution_hours: u32,
    pub sentiment_score:           f64,
    pub is_escalated:              bool,
    pub resolved_at:               Option<DateTime<Utc>>,
    pub created_at:                DateTime<Utc>,
    pub updated_at:                DateTime<Utc>,
    pub upvotes:                   Vec<UserId>,
    pub feedback:                  Option<Feedback>,

    /// Optimistic concurrency counter, bumped on every successful save.
    pub version: i64,
}

/// Citizen-submitted intake form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewComplaint {
    pub title:       String,
    pub description: String,
    #[serde(default)]
    pub category:    Option<String>,
    #[serde(default)]
    pub location:    Option<Location>,
    #[serde(default)]
    pub latitude:    Option<f64>,
    #[serde(default)]
    pub longitude:   Option<f64>,
    #[serde(default)]
    pub image:       Option<String>,
    /// Label/confidence already computed on the client, if any.
    #[serde(default)]
    pub ai:          Option<Classification>,
}

impl Complaint {
    /// Build a fresh pending complaint. SLA hours and initial priority are
    /// derived here and nowhere else.
    pub fn open(
        id: ComplaintId,
        owner: UserId,
        title: String,
        description: String,
        category: Category,
        sentiment_score: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            title,
            description,
            category,
            location: None,
            coordinates: None,
            image: None,
            ai: None,
            status: Status::Pending,
            priority: priority::classify(sentiment_score),
            expected_resolution_hours: sla_policy::expected_hours(category),
            sentiment_score,
            is_escalated: false,
            resolved_at: None,
            created_at: now,
            updated_at: now,
            upvotes: Vec::new(),
            feedback: None,
            version: 0,
        }
    }

    pub fn sla_deadline(&self) -> DateTime<Utc> {
        sla_policy::deadline(self.created_at, self.expected_resolution_hours)
    }

    /// Strictly past the deadline. Exactly at the deadline is still on time.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now > self.sla_deadline()
    }

    pub fn is_resolved(&self) -> bool {
        self.status == Status::Resolved
    }

    /// Apply an administrator status change. `Resolved` is terminal.
    pub fn apply_status(&mut self, to: Status, now: DateTime<Utc>) -> CivicResult<()> {
        if self.is_resolved() {
            return Err(CivicError::IllegalTransition { from: self.status, to });
        }
        self.status = to;
        if to == Status::Resolved && self.resolved_at.is_none() {
            self.resolved_at = Some(now);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Flag an SLA breach. Returns false (and changes nothing) when the
    /// complaint is already escalated or resolved.
    pub fn escalate(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_escalated || self.is_resolved() {
            return false;
        }
        self.is_escalated = true;
        self.priority = priority::escalated(self.priority);
        self.updated_at = now;
        true
    }

    /// Add or remove `user` from the upvote set. Returns whether `user`
    /// upvotes after the toggle.
    pub fn toggle_upvote(&mut self, user: &str, now: DateTime<Utc>) -> bool {
        self.updated_at = now;
        if let Some(pos) = self.upvotes.iter().position(|u| u == user) {
            self.upvotes.remove(pos);
            false
        } else {
            self.upvotes.push(user.to_string());
            true
        }
    }

    /// Record owner feedback. Only legal once resolved.
    pub fn set_feedback(
        &mut self,
        author: &str,
        rating: u8,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> CivicResult<()> {
        if !self.is_resolved() {
            return Err(CivicError::Validation(
                "can only rate resolved complaints".into(),
            ));
        }
        if author != self.owner {
            return Err(CivicError::Unauthorized { action: "rate this complaint" });
        }
        if !(1..=5).contains(&rating) {
            return Err(CivicError::Validation(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }
        self.feedback = Some(Feedback { rating, comment });
        self.updated_at = now;
        Ok(())
    }
}
