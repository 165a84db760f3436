use super::{parse_label, parse_ts, ts, CivicStore};
use crate::{error::CivicResult, repository::UserDirectory, types::Role, user::User};
use rusqlite::{params, OptionalExtension};

fn user_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        role: parse_label(4, row.get(4)?)?,
        created_at: parse_ts(5, row.get(5)?)?,
    })
}

impl UserDirectory for CivicStore {
    fn insert_user(&self, u: &User) -> CivicResult<()> {
        self.conn()?.execute(
            "INSERT INTO app_user (id, name, email, phone, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![&u.id, &u.name, &u.email, u.phone.as_deref(), u.role.as_str(), ts(&u.created_at)],
        )?;
        Ok(())
    }

    fn find_user(&self, id: &str) -> CivicResult<Option<User>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, email, phone, role, created_at FROM app_user WHERE id = ?1",
            params![id],
            user_row_mapper,
        )
        .optional()
        .map_err(Into::into)
    }

    fn find_user_by_email(&self, email: &str) -> CivicResult<Option<User>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, email, phone, role, created_at FROM app_user WHERE email = ?1",
            params![email],
            user_row_mapper,
        )
        .optional()
        .map_err(Into::into)
    }

    fn find_users_by_role(&self, role: Role) -> CivicResult<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, email, phone, role, created_at FROM app_user
             WHERE role = ?1 ORDER BY created_at ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![role.as_str()], user_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn find_all_users(&self) -> CivicResult<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, email, phone, role, created_at FROM app_user
             ORDER BY created_at ASC, id ASC",
        )?;
        let rows = stmt.query_map([], user_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
