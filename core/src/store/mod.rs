//! SQLite persistence layer.
//!
//! RULE: Only the store module talks to the database.
//! Services call store methods (directly or through the repository
//! traits); they never execute SQL themselves.

mod analytics;
mod comment;
mod complaint;
mod notification;
mod setting;
mod user;

pub use analytics::ResolvedRow;

use crate::error::{CivicError, CivicResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{types::Type, Connection};
use serde::{de::DeserializeOwned, Serialize};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

pub struct CivicStore {
    conn: Mutex<Connection>,
}

impl CivicStore {
    pub fn open(path: &str) -> CivicResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> CivicResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> CivicResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        conn.execute_batch(include_str!("../../migrations/002_comments_settings.sql"))?;
        Ok(())
    }

    fn conn(&self) -> CivicResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CivicError::Other(anyhow::anyhow!("store connection lock poisoned")))
    }
}

// ── Column codecs ──────────────────────────────────────────────────
//
// Timestamps are RFC 3339 text with a fixed-width fraction so they sort
// lexically. Enums are their snake_case labels. Nested values are JSON.

pub(crate) fn ts(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(idx: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parse_opt_ts(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    raw.map(|r| parse_ts(idx, r)).transpose()
}

pub(crate) fn parse_label<T: FromStr>(idx: usize, raw: String) -> rusqlite::Result<T> {
    raw.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unrecognized value '{raw}'").into(),
        )
    })
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> CivicResult<String> {
    Ok(serde_json::to_string(value)?)
}

pub(crate) fn to_opt_json<T: Serialize>(value: Option<&T>) -> CivicResult<Option<String>> {
    value.map(to_json).transpose()
}

pub(crate) fn parse_json<T: DeserializeOwned>(idx: usize, raw: String) -> rusqlite::Result<T> {
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parse_opt_json<T: DeserializeOwned>(
    idx: usize,
    raw: Option<String>,
) -> rusqlite::Result<Option<T>> {
    raw.map(|r| parse_json(idx, r)).transpose()
}
