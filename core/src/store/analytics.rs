//! Aggregate queries behind the admin dashboard and the public
//! transparency page.

use super::{parse_label, parse_ts, CivicStore};
use crate::{
    error::CivicResult,
    types::{Category, Status},
};
use chrono::{DateTime, Utc};

/// Timing of one resolved complaint.
#[derive(Debug, Clone)]
pub struct ResolvedRow {
    pub category:    Category,
    pub created_at:  DateTime<Utc>,
    pub resolved_at: DateTime<Utc>,
}

impl CivicStore {
    pub fn complaint_count(&self) -> CivicResult<i64> {
        Ok(self
            .conn()?
            .query_row("SELECT COUNT(*) FROM complaint", [], |r| r.get(0))?)
    }

    pub fn escalated_count(&self) -> CivicResult<i64> {
        Ok(self.conn()?.query_row(
            "SELECT COUNT(*) FROM complaint WHERE is_escalated = 1",
            [],
            |r| r.get(0),
        )?)
    }

    pub fn status_counts(&self) -> CivicResult<Vec<(Status, i64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT status, COUNT(*) FROM complaint GROUP BY status ORDER BY status",
        )?;
        let rows = stmt.query_map([], |r| -> rusqlite::Result<(Status, i64)> {
            Ok((parse_label(0, r.get(0)?)?, r.get(1)?))
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn category_counts(&self) -> CivicResult<Vec<(Category, i64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT category, COUNT(*) FROM complaint GROUP BY category ORDER BY category",
        )?;
        let rows = stmt.query_map([], |r| -> rusqlite::Result<(Category, i64)> {
            Ok((parse_label(0, r.get(0)?)?, r.get(1)?))
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn resolved_rows(&self) -> CivicResult<Vec<ResolvedRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT category, created_at, resolved_at FROM complaint
             WHERE status = 'resolved' AND resolved_at IS NOT NULL",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(ResolvedRow {
                category: parse_label(0, r.get(0)?)?,
                created_at: parse_ts(1, r.get(1)?)?,
                resolved_at: parse_ts(2, r.get(2)?)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
