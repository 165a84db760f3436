//! SLA policy: category → expected resolution time.
//!
//! Pure lookup. Unknown category labels are not an error; they get the
//! `other` allowance.

use crate::types::Category;
use chrono::{DateTime, Duration, Utc};

/// Hours allowed for an `other` complaint, and the fallback for anything
/// unrecognized.
pub const DEFAULT_SLA_HOURS: u32 = 72;

pub fn expected_hours(category: Category) -> u32 {
    match category {
        Category::Pothole     => 72,
        Category::Garbage     => 24,
        Category::Water       => 48,
        Category::Electricity => 48,
        Category::Road        => 72,
        Category::Other       => DEFAULT_SLA_HOURS,
    }
}

/// Lookup by raw label, for callers holding an unvalidated string.
pub fn expected_hours_for_label(label: &str) -> u32 {
    label
        .parse::<Category>()
        .map(expected_hours)
        .unwrap_or(DEFAULT_SLA_HOURS)
}

/// `created_at + hours`. The SLA deadline anchor.
pub fn deadline(created_at: DateTime<Utc>, hours: u32) -> DateTime<Utc> {
    created_at + Duration::hours(i64::from(hours))
}
