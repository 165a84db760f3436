//! Discussion thread on a complaint.

use crate::{
    clock::Clock,
    error::{CivicError, CivicResult},
    repository::{ComplaintRepository, UserDirectory},
    store::CivicStore,
    types::{new_id, Actor, ComplaintId, EntityId, Role, UserId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A comment joined with its author's display details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id:           EntityId,
    pub complaint_id: ComplaintId,
    pub author_id:    UserId,
    pub author_name:  String,
    pub author_role:  Role,
    pub text:         String,
    pub created_at:   DateTime<Utc>,
}

pub struct CommentService {
    store: Arc<CivicStore>,
    clock: Arc<dyn Clock>,
}

impl CommentService {
    pub fn new(store: Arc<CivicStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn add(&self, complaint_id: &str, actor: &Actor, text: &str) -> CivicResult<CommentView> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CivicError::Validation("comment text is required".into()));
        }
        if self.store.find_complaint(complaint_id)?.is_none() {
            return Err(CivicError::not_found("Complaint", complaint_id));
        }
        if self.store.find_user(&actor.user_id)?.is_none() {
            return Err(CivicError::not_found("User", actor.user_id.clone()));
        }

        let id = new_id();
        self.store
            .insert_comment(&id, complaint_id, &actor.user_id, text, &self.clock.now())?;

        self.store
            .comments_for(complaint_id)?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CivicError::not_found("Comment", id))
    }

    /// Oldest first, so the thread reads as a conversation.
    pub fn list(&self, complaint_id: &str) -> CivicResult<Vec<CommentView>> {
        self.store.comments_for(complaint_id)
    }
}
