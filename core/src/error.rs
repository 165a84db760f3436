use crate::types::Status;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CivicError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid status value '{value}'")]
    InvalidStatus { value: String },

    #[error("Illegal status transition: {from} -> {to}")]
    IllegalTransition { from: Status, to: Status },

    #[error("Not authorized to {action}")]
    Unauthorized { action: &'static str },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Complaint '{id}' was modified concurrently")]
    StaleWrite { id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification an outer API layer maps to a response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidStatus,
    Unauthorized,
    Validation,
    Conflict,
    Internal,
}

impl CivicError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidStatus { .. } | Self::IllegalTransition { .. } => ErrorKind::InvalidStatus,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Validation(_) => ErrorKind::Validation,
            Self::StaleWrite { .. } => ErrorKind::Conflict,
            Self::Database(_) | Self::Serialization(_) | Self::Other(_) => ErrorKind::Internal,
        }
    }
}

pub type CivicResult<T> = Result<T, CivicError>;
