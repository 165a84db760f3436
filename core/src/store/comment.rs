use super::{parse_label, parse_ts, ts, CivicStore};
use crate::{comment::CommentView, error::CivicResult};
use chrono::{DateTime, Utc};
use rusqlite::params;

impl CivicStore {
    // ── Comment ────────────────────────────────────────────────────

    pub fn insert_comment(
        &self,
        comment_id: &str,
        complaint_id: &str,
        author_id: &str,
        text: &str,
        created_at: &DateTime<Utc>,
    ) -> CivicResult<()> {
        self.conn()?.execute(
            "INSERT INTO comment (id, complaint_id, author_id, text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![comment_id, complaint_id, author_id, text, ts(created_at)],
        )?;
        Ok(())
    }

    /// Comments on a complaint joined with their author, oldest first.
    pub fn comments_for(&self, complaint_id: &str) -> CivicResult<Vec<CommentView>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT c.id, c.complaint_id, c.author_id, u.name, u.role, c.text, c.created_at
             FROM comment c JOIN app_user u ON u.id = c.author_id
             WHERE c.complaint_id = ?1
             ORDER BY c.created_at ASC, c.rowid ASC",
        )?;
        let rows = stmt.query_map(params![complaint_id], |r| {
            Ok(CommentView {
                id: r.get(0)?,
                complaint_id: r.get(1)?,
                author_id: r.get(2)?,
                author_name: r.get(3)?,
                author_role: parse_label(4, r.get(4)?)?,
                text: r.get(5)?,
                created_at: parse_ts(6, r.get(6)?)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
