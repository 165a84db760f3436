use super::{parse_label, parse_ts, ts, CivicStore};
use crate::{error::CivicResult, event::NotificationRecord, repository::NotificationInbox};
use rusqlite::{params, OptionalExtension};

fn notification_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<NotificationRecord> {
    Ok(NotificationRecord {
        id: row.get(0)?,
        recipient: row.get(1)?,
        kind: parse_label(2, row.get(2)?)?,
        title: row.get(3)?,
        message: row.get(4)?,
        related_complaint_id: row.get(5)?,
        is_read: row.get::<_, i32>(6)? != 0,
        created_at: parse_ts(7, row.get(7)?)?,
    })
}

impl NotificationInbox for CivicStore {
    fn insert_notification(&self, n: &NotificationRecord) -> CivicResult<()> {
        self.conn()?.execute(
            "INSERT INTO notification (id, recipient_id, kind, title, message,
                 related_complaint_id, is_read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &n.id,
                &n.recipient,
                n.kind.as_str(),
                &n.title,
                &n.message,
                n.related_complaint_id.as_deref(),
                if n.is_read { 1i32 } else { 0i32 },
                ts(&n.created_at),
            ],
        )?;
        Ok(())
    }

    fn find_notification(&self, id: &str) -> CivicResult<Option<NotificationRecord>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, recipient_id, kind, title, message, related_complaint_id, is_read, created_at
             FROM notification WHERE id = ?1",
            params![id],
            notification_row_mapper,
        )
        .optional()
        .map_err(Into::into)
    }

    fn notifications_for(&self, recipient: &str) -> CivicResult<Vec<NotificationRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, recipient_id, kind, title, message, related_complaint_id, is_read, created_at
             FROM notification WHERE recipient_id = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map(params![recipient], notification_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn mark_notification_read(&self, id: &str) -> CivicResult<()> {
        self.conn()?.execute(
            "UPDATE notification SET is_read = 1 WHERE id = ?1",
            params![id],
        )?;
        Ok(())
    }

    fn mark_all_notifications_read(&self, recipient: &str) -> CivicResult<usize> {
        let changed = self.conn()?.execute(
            "UPDATE notification SET is_read = 1 WHERE recipient_id = ?1 AND is_read = 0",
            params![recipient],
        )?;
        Ok(changed)
    }
}
