use super::{parse_json, ts, CivicStore};
use crate::error::CivicResult;
use chrono::{DateTime, Utc};
use rusqlite::params;
use std::collections::BTreeMap;

impl CivicStore {
    // ── Setting ────────────────────────────────────────────────────

    pub fn upsert_setting(
        &self,
        key: &str,
        value: &serde_json::Value,
        updated_by: &str,
        at: &DateTime<Utc>,
    ) -> CivicResult<()> {
        let value_json = serde_json::to_string(value)?;
        self.conn()?.execute(
            "INSERT INTO setting (key, value_json, updated_by, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET
                 value_json = excluded.value_json,
                 updated_by = excluded.updated_by,
                 updated_at = excluded.updated_at",
            params![key, value_json, updated_by, ts(at)],
        )?;
        Ok(())
    }

    pub fn all_settings(&self) -> CivicResult<BTreeMap<String, serde_json::Value>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key, value_json FROM setting ORDER BY key")?;
        let rows = stmt.query_map([], |r| {
            let key: String = r.get(0)?;
            let value: serde_json::Value = parse_json(1, r.get(1)?)?;
            Ok((key, value))
        })?;
        rows.collect::<Result<BTreeMap<_, _>, _>>().map_err(Into::into)
    }
}
