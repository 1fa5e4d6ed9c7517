//! Domain error types.

use thiserror::Error;

use crate::repository::RepositoryError;

/// Errors surfaced by the service layer.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The requested entity does not exist.
    #[error("{entity_type} not found: id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The input could not be accepted.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The operation would break a reference between entities.
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    /// The underlying store is temporarily unavailable.
    #[error("Store unavailable: {0}")]
    Transient(String),

    /// Unexpected failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "not_found",
            DomainError::BadRequest(_) => "bad_request",
            DomainError::IntegrityViolation(_) => "integrity_violation",
            DomainError::Transient(_) => "transient",
            DomainError::Internal(_) => "internal",
        }
    }

    /// Translates a persistence port failure for the given entity.
    pub fn from_repository(entity_type: &'static str, err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => DomainError::NotFound {
                entity_type,
                id: id.to_string(),
            },
            RepositoryError::IntegrityViolation(msg) => DomainError::IntegrityViolation(msg),
            RepositoryError::Transient(msg) => DomainError::Transient(msg),
            RepositoryError::Backend(msg) => DomainError::Internal(msg),
        }
    }
}
