//! Admin dashboard figures and the public transparency views.

use crate::{
    complaint::{Coordinates, Location},
    error::{CivicError, CivicResult},
    store::{CivicStore, ResolvedRow},
    types::{Actor, Category, ComplaintId, Status},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count:    i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResolution {
    pub category:  Category,
    pub avg_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminAnalytics {
    pub total_complaints:       i64,
    pub resolved_count:         i64,
    pub pending_count:          i64,
    pub in_progress_count:      i64,
    pub escalated_count:        i64,
    /// Percentage, two decimals.
    pub resolution_rate:        f64,
    /// Mean of `resolved_at - created_at` in hours, two decimals.
    pub avg_resolution_hours:   f64,
    pub category_stats:         Vec<CategoryCount>,
    pub resolution_by_category: Vec<CategoryResolution>,
}

/// Anonymized complaint summary for public listings. No owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicComplaint {
    pub title:      String,
    pub category:   Category,
    pub status:     Status,
    pub created_at: DateTime<Utc>,
    pub location:   Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicStats {
    pub total:      i64,
    pub resolved:   i64,
    /// Anything not yet resolved.
    pub pending:    i64,
    pub categories: Vec<CategoryCount>,
    pub recent:     Vec<PublicComplaint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub id:          ComplaintId,
    pub title:       String,
    pub category:    Category,
    pub status:      Status,
    pub coordinates: Coordinates,
    pub location:    Option<Location>,
    pub created_at:  DateTime<Utc>,
}

pub struct AnalyticsService {
    store: Arc<CivicStore>,
}

impl AnalyticsService {
    pub fn new(store: Arc<CivicStore>) -> Self {
        Self { store }
    }

    pub fn analytics(&self, actor: &Actor) -> CivicResult<AdminAnalytics> {
        if !actor.is_admin() {
            return Err(CivicError::Unauthorized { action: "view analytics" });
        }

        let total = self.store.complaint_count()?;
        let by_status: BTreeMap<&'static str, i64> = self
            .store
            .status_counts()?
            .into_iter()
            .map(|(s, n)| (s.as_str(), n))
            .collect();
        let count_of = |s: Status| by_status.get(s.as_str()).copied().unwrap_or(0);
        let resolved = count_of(Status::Resolved);

        let resolution_rate = if total == 0 {
            0.0
        } else {
            round2(resolved as f64 / total as f64 * 100.0)
        };

        let rows = self.store.resolved_rows()?;
        let avg_resolution_hours = mean_hours(rows.iter()).map(round2).unwrap_or(0.0);

        let mut per_category: BTreeMap<Category, Vec<&ResolvedRow>> = BTreeMap::new();
        for row in &rows {
            per_category.entry(row.category).or_default().push(row);
        }
        let resolution_by_category = per_category
            .into_iter()
            .filter_map(|(category, rows)| {
                mean_hours(rows.into_iter()).map(|h| CategoryResolution {
                    category,
                    avg_hours: round2(h),
                })
            })
            .collect();

        Ok(AdminAnalytics {
            total_complaints: total,
            resolved_count: resolved,
            pending_count: count_of(Status::Pending),
            in_progress_count: count_of(Status::InProgress),
            escalated_count: self.store.escalated_count()?,
            resolution_rate,
            avg_resolution_hours,
            category_stats: self.category_stats()?,
            resolution_by_category,
        })
    }

    pub fn public_stats(&self) -> CivicResult<PublicStats> {
        let total = self.store.complaint_count()?;
        let resolved = self
            .store
            .status_counts()?
            .into_iter()
            .find(|(s, _)| *s == Status::Resolved)
            .map(|(_, n)| n)
            .unwrap_or(0);

        let recent = self
            .store
            .recent_complaints(RECENT_LIMIT)?
            .into_iter()
            .map(|c| PublicComplaint {
                title: c.title,
                category: c.category,
                status: c.status,
                created_at: c.created_at,
                location: c.location,
            })
            .collect();

        Ok(PublicStats {
            total,
            resolved,
            pending: total - resolved,
            categories: self.category_stats()?,
            recent,
        })
    }

    pub fn map_points(&self) -> CivicResult<Vec<MapPoint>> {
        Ok(self
            .store
            .complaints_with_coordinates()?
            .into_iter()
            .filter_map(|c| {
                let coordinates = c.coordinates?;
                Some(MapPoint {
                    id: c.id,
                    title: c.title,
                    category: c.category,
                    status: c.status,
                    coordinates,
                    location: c.location,
                    created_at: c.created_at,
                })
            })
            .collect())
    }

    fn category_stats(&self) -> CivicResult<Vec<CategoryCount>> {
        Ok(self
            .store
            .category_counts()?
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect())
    }
}

fn mean_hours<'a>(rows: impl Iterator<Item = &'a ResolvedRow>) -> Option<f64> {
    let (sum, n) = rows.fold((0.0, 0usize), |(sum, n), r| {
        let secs = (r.resolved_at - r.created_at).num_seconds() as f64;
        (sum + secs / 3600.0, n + 1)
    });
    (n > 0).then(|| sum / n as f64)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
