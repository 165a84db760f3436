//! Priority classifier: sentiment score → initial priority.
//!
//! Called once per complaint, at creation. Never yields `Low`.

use crate::types::Priority;

pub fn classify(sentiment_score: f64) -> Priority {
    if sentiment_score < -3.0 {
        Priority::Urgent
    } else if sentiment_score < 0.0 {
        Priority::High
    } else {
        Priority::Medium
    }
}

/// Priority after an SLA breach: bumped to `High` unless already `Urgent`.
/// Never lowers an existing priority.
pub fn escalated(current: Priority) -> Priority {
    current.max(Priority::High)
}
