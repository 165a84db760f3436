//! Admin-editable key/value settings.

use crate::{
    clock::Clock,
    error::{CivicError, CivicResult},
    store::CivicStore,
    types::Actor,
};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct SettingsService {
    store: Arc<CivicStore>,
    clock: Arc<dyn Clock>,
}

impl SettingsService {
    pub fn new(store: Arc<CivicStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn get_all(&self) -> CivicResult<BTreeMap<String, serde_json::Value>> {
        self.store.all_settings()
    }

    /// Create or replace `key`.
    pub fn upsert(&self, actor: &Actor, key: &str, value: serde_json::Value) -> CivicResult<()> {
        if !actor.is_admin() {
            return Err(CivicError::Unauthorized { action: "change settings" });
        }
        let key = key.trim();
        if key.is_empty() {
            return Err(CivicError::Validation("setting key is required".into()));
        }
        self.store
            .upsert_setting(key, &value, &actor.user_id, &self.clock.now())?;
        log::info!("Setting '{key}' updated by {}", actor.user_id);
        Ok(())
    }
}
