//! Complaint intake and citizen-facing operations.
//!
//! Intake is the only place sentiment is scored and the initial priority and
//! SLA allowance are fixed. Nothing downstream recomputes them.

use crate::{
    classifier::ImageClassifier,
    clock::Clock,
    complaint::{Complaint, Coordinates, NewComplaint},
    error::{CivicError, CivicResult},
    repository::{ComplaintFilter, ComplaintRepository, UserDirectory},
    sentiment::SentimentScorer,
    types::{new_id, Actor, Category, Status},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpvoteResult {
    pub count:      usize,
    pub is_upvoted: bool,
}

pub struct ComplaintService {
    complaints: Arc<dyn ComplaintRepository>,
    users:      Arc<dyn UserDirectory>,
    scorer:     Arc<dyn SentimentScorer>,
    classifier: Arc<dyn ImageClassifier>,
    clock:      Arc<dyn Clock>,
}

impl ComplaintService {
    pub fn new(
        complaints: Arc<dyn ComplaintRepository>,
        users: Arc<dyn UserDirectory>,
        scorer: Arc<dyn SentimentScorer>,
        classifier: Arc<dyn ImageClassifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { complaints, users, scorer, classifier, clock }
    }

    /// File a new complaint on behalf of `actor`.
    pub fn create(&self, actor: &Actor, form: NewComplaint) -> CivicResult<Complaint> {
        let title = form.title.trim();
        let description = form.description.trim();
        if title.is_empty() || description.is_empty() {
            return Err(CivicError::Validation(
                "title and description are required".into(),
            ));
        }

        if self.users.find_user(&actor.user_id)?.is_none() {
            return Err(CivicError::not_found("User", actor.user_id.clone()));
        }

        let category = match form.category.as_deref().map(str::trim) {
            None | Some("") => Category::Other,
            Some(raw) => raw
                .parse::<Category>()
                .map_err(|_| CivicError::Validation(format!("unknown category '{raw}'")))?,
        };

        let score = self.scorer.score(&format!("{title} {description}"));
        let now = self.clock.now();

        let mut complaint = Complaint::open(
            new_id(),
            actor.user_id.clone(),
            title.to_string(),
            description.to_string(),
            category,
            score,
            now,
        );
        complaint.location = form.location;
        complaint.coordinates = form
            .latitude
            .zip(form.longitude)
            .map(|(lat, lng)| Coordinates { lat, lng });
        complaint.image = form.image.filter(|p| !p.trim().is_empty()).map(|p| p.replace('\\', "/"));
        complaint.ai = match (form.ai, complaint.image.as_deref()) {
            (Some(client), _) => Some(client),
            (None, Some(image)) => Some(self.classifier.classify(image, description)),
            (None, None) => None,
        };

        self.complaints.insert_complaint(&complaint)?;
        log::info!(
            "Complaint {} filed: category={} priority={} sla={}h sentiment={}",
            complaint.id,
            complaint.category,
            complaint.priority,
            complaint.expected_resolution_hours,
            complaint.sentiment_score,
        );
        Ok(complaint)
    }

    pub fn get(&self, id: &str) -> CivicResult<Complaint> {
        self.complaints
            .find_complaint(id)?
            .ok_or_else(|| CivicError::not_found("Complaint", id))
    }

    /// The actor's own complaints, newest first.
    pub fn list_mine(&self, actor: &Actor) -> CivicResult<Vec<Complaint>> {
        self.complaints
            .find_complaints(&ComplaintFilter::owned_by(actor.user_id.clone()))
    }

    /// Every complaint, optionally narrowed by status and category. Admin only.
    pub fn list_all(
        &self,
        actor: &Actor,
        status: Option<Status>,
        category: Option<Category>,
    ) -> CivicResult<Vec<Complaint>> {
        if !actor.is_admin() {
            return Err(CivicError::Unauthorized { action: "list all complaints" });
        }
        self.complaints.find_complaints(&ComplaintFilter {
            status,
            category,
            ..ComplaintFilter::default()
        })
    }

    pub fn toggle_upvote(&self, id: &str, actor: &Actor) -> CivicResult<UpvoteResult> {
        let mut complaint = self.get(id)?;
        let is_upvoted = complaint.toggle_upvote(&actor.user_id, self.clock.now());
        let saved = self.complaints.save_complaint(&complaint)?;
        Ok(UpvoteResult { count: saved.upvotes.len(), is_upvoted })
    }

    /// Owner rating of a resolved complaint.
    pub fn submit_feedback(
        &self,
        id: &str,
        actor: &Actor,
        rating: u8,
        comment: Option<String>,
    ) -> CivicResult<Complaint> {
        let mut complaint = self.get(id)?;
        complaint.set_feedback(&actor.user_id, rating, comment, self.clock.now())?;
        self.complaints.save_complaint(&complaint)
    }
}
