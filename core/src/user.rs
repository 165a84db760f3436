//! User directory entries and registration.
//!
//! Credentials and login live outside this crate; a user here is the
//! addressable identity notifications are routed to.

use crate::{
    clock::Clock,
    error::{CivicError, CivicResult},
    repository::UserDirectory,
    types::{new_id, Actor, Role, UserId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id:         UserId,
    pub name:       String,
    pub email:      String,
    pub phone:      Option<String>,
    pub role:       Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name:  String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_role")]
    pub role:  Role,
}

fn default_role() -> Role {
    Role::User
}

pub struct UserService {
    users: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserDirectory>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    pub fn register(&self, new: NewUser) -> CivicResult<User> {
        let name = new.name.trim();
        let email = new.email.trim().to_lowercase();
        if name.is_empty() {
            return Err(CivicError::Validation("name is required".into()));
        }
        if !email.contains('@') {
            return Err(CivicError::Validation(format!("invalid email '{email}'")));
        }
        if self.users.find_user_by_email(&email)?.is_some() {
            return Err(CivicError::Validation(format!("email '{email}' already registered")));
        }

        let user = User {
            id: new_id(),
            name: name.to_string(),
            email,
            phone: new.phone.filter(|p| !p.trim().is_empty()),
            role: new.role,
            created_at: self.clock.now(),
        };
        match self.users.insert_user(&user) {
            Ok(()) => {}
            // Lost a race with a concurrent registration of the same address.
            Err(e) if is_unique_violation(&e) => {
                return Err(CivicError::Validation(format!(
                    "email '{}' already registered",
                    user.email
                )));
            }
            Err(e) => return Err(e),
        }
        log::info!("Registered {} user {}", user.role.as_str(), user.id);
        Ok(user)
    }

    pub fn get(&self, id: &str) -> CivicResult<User> {
        self.users
            .find_user(id)?
            .ok_or_else(|| CivicError::not_found("User", id))
    }

    /// Every registered user, oldest first. Admin only.
    pub fn list(&self, actor: &Actor) -> CivicResult<Vec<User>> {
        if !actor.is_admin() {
            return Err(CivicError::Unauthorized { action: "list users" });
        }
        self.users.find_all_users()
    }
}

fn is_unique_violation(err: &CivicError) -> bool {
    matches!(
        err,
        CivicError::Database(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
