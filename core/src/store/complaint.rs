use super::{parse_json, parse_label, parse_opt_json, parse_opt_ts, parse_ts, to_json, to_opt_json, ts, CivicStore};
use crate::{
    complaint::{Complaint, Coordinates},
    error::{CivicError, CivicResult},
    repository::{ComplaintFilter, ComplaintRepository},
};
use rusqlite::{params, params_from_iter, OptionalExtension};

const COMPLAINT_COLUMNS: &str =
    "id, owner_id, title, description, category, location_json, lat, lng, image, ai_json,
     status, priority, expected_resolution_hours, sentiment_score, is_escalated,
     resolved_at, created_at, updated_at, upvotes_json, feedback_json, version";

// Helper function for mapping complaint rows
fn complaint_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Complaint> {
    let lat: Option<f64> = row.get(6)?;
    let lng: Option<f64> = row.get(7)?;
    Ok(Complaint {
        id: row.get(0)?,
        owner: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category: parse_label(4, row.get(4)?)?,
        location: parse_opt_json(5, row.get(5)?)?,
        coordinates: lat.zip(lng).map(|(lat, lng)| Coordinates { lat, lng }),
        image: row.get(8)?,
        ai: parse_opt_json(9, row.get(9)?)?,
        status: parse_label(10, row.get(10)?)?,
        priority: parse_label(11, row.get(11)?)?,
        expected_resolution_hours: row.get::<_, i64>(12)? as u32,
        sentiment_score: row.get(13)?,
        is_escalated: row.get::<_, i32>(14)? != 0,
        resolved_at: parse_opt_ts(15, row.get(15)?)?,
        created_at: parse_ts(16, row.get(16)?)?,
        updated_at: parse_ts(17, row.get(17)?)?,
        upvotes: parse_json(18, row.get(18)?)?,
        feedback: parse_opt_json(19, row.get(19)?)?,
        version: row.get(20)?,
    })
}

impl CivicStore {
    // ── Complaint ──────────────────────────────────────────────────

    /// Complaints that carry a map pin, newest first.
    pub fn complaints_with_coordinates(&self) -> CivicResult<Vec<Complaint>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaint
             WHERE lat IS NOT NULL AND lng IS NOT NULL
             ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], complaint_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn recent_complaints(&self, limit: usize) -> CivicResult<Vec<Complaint>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaint
             ORDER BY created_at DESC LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![limit as i64], complaint_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn complaint_exists(&self, id: &str) -> CivicResult<bool> {
        let conn = self.conn()?;
        let found: Option<i64> = conn
            .query_row("SELECT 1 FROM complaint WHERE id = ?1", params![id], |r| r.get(0))
            .optional()?;
        Ok(found.is_some())
    }
}

impl ComplaintRepository for CivicStore {
    fn insert_complaint(&self, c: &Complaint) -> CivicResult<()> {
        let location = to_opt_json(c.location.as_ref())?;
        let ai = to_opt_json(c.ai.as_ref())?;
        let upvotes = to_json(&c.upvotes)?;
        let feedback = to_opt_json(c.feedback.as_ref())?;
        self.conn()?.execute(
            &format!(
                "INSERT INTO complaint ({COMPLAINT_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                         ?15, ?16, ?17, ?18, ?19, ?20, ?21)"
            ),
            params![
                &c.id,
                &c.owner,
                &c.title,
                &c.description,
                c.category.as_str(),
                location,
                c.coordinates.map(|p| p.lat),
                c.coordinates.map(|p| p.lng),
                c.image.as_deref(),
                ai,
                c.status.as_str(),
                c.priority.as_str(),
                i64::from(c.expected_resolution_hours),
                c.sentiment_score,
                if c.is_escalated { 1i32 } else { 0i32 },
                c.resolved_at.as_ref().map(ts),
                ts(&c.created_at),
                ts(&c.updated_at),
                upvotes,
                feedback,
                c.version,
            ],
        )?;
        Ok(())
    }

    fn find_complaint(&self, id: &str) -> CivicResult<Option<Complaint>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {COMPLAINT_COLUMNS} FROM complaint WHERE id = ?1"),
            params![id],
            complaint_row_mapper,
        )
        .optional()
        .map_err(Into::into)
    }

    fn find_complaints(&self, filter: &ComplaintFilter) -> CivicResult<Vec<Complaint>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut args: Vec<String> = Vec::new();
        if let Some(status) = filter.status {
            args.push(status.as_str().to_string());
            clauses.push(format!("status = ?{}", args.len()));
        }
        if let Some(status) = filter.status_not {
            args.push(status.as_str().to_string());
            clauses.push(format!("status <> ?{}", args.len()));
        }
        if let Some(category) = filter.category {
            args.push(category.as_str().to_string());
            clauses.push(format!("category = ?{}", args.len()));
        }
        if let Some(owner) = &filter.owner {
            args.push(owner.clone());
            clauses.push(format!("owner_id = ?{}", args.len()));
        }
        if let Some(escalated) = filter.is_escalated {
            clauses.push(format!("is_escalated = {}", i32::from(escalated)));
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaint {where_sql} ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map(params_from_iter(args.iter()), complaint_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn save_complaint(&self, c: &Complaint) -> CivicResult<Complaint> {
        let upvotes = to_json(&c.upvotes)?;
        let feedback = to_opt_json(c.feedback.as_ref())?;
        let changed = self.conn()?.execute(
            "UPDATE complaint SET status = ?1, priority = ?2, is_escalated = ?3,
                 resolved_at = ?4, upvotes_json = ?5, feedback_json = ?6,
                 updated_at = ?7, version = version + 1
             WHERE id = ?8 AND version = ?9",
            params![
                c.status.as_str(),
                c.priority.as_str(),
                if c.is_escalated { 1i32 } else { 0i32 },
                c.resolved_at.as_ref().map(ts),
                upvotes,
                feedback,
                ts(&c.updated_at),
                &c.id,
                c.version,
            ],
        )?;

        if changed == 0 {
            return Err(if self.complaint_exists(&c.id)? {
                CivicError::StaleWrite { id: c.id.clone() }
            } else {
                CivicError::not_found("Complaint", &c.id)
            });
        }

        let mut saved = c.clone();
        saved.version += 1;
        Ok(saved)
    }
}
