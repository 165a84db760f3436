//! Image classification collaborator.
//!
//! Treated as opaque: anything that turns an uploaded photo (plus the
//! description) into a label/confidence pair can stand in.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label:      String,
    pub confidence: f64,
}

pub trait ImageClassifier: Send + Sync {
    fn classify(&self, image_path: &str, description: &str) -> Classification;
}

/// Keyword fallback used when no real model is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl ImageClassifier for KeywordClassifier {
    fn classify(&self, _image_path: &str, description: &str) -> Classification {
        let text = description.to_lowercase();
        let (label, confidence) = if text.contains("pothole") {
            ("pothole", 0.95)
        } else if text.contains("garbage") || text.contains("trash") {
            ("garbage", 0.88)
        } else {
            ("uncategorized", 0.50)
        };
        Classification { label: label.to_string(), confidence }
    }
}
