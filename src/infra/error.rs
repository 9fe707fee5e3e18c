//! Error types for the collection platform core.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::SubmissionStatus;

/// Errors produced by the core services.
///
/// The first four families are the contract with the API layer: validation,
/// authorization, visibility, and lifecycle-state failures. None of them is
/// retried internally; a failed operation never leaves a partial write.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed or structurally invalid input
    #[error("validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// Actor lacks the capability for the requested operation
    #[error("not authorized: {0}")]
    Authorization(String),

    /// Suspended accounts are denied every mutating operation
    #[error("account is suspended")]
    Suspended,

    /// Referenced resource does not exist or is not visible to the actor
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },

    /// Attempted transition out of a terminal state
    #[error("invalid status transition for submission {id}: {from} -> {to}")]
    InvalidTransition {
        id: Uuid,
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    /// Attempted delete of a submission in a non-deletable state
    #[error("cannot delete submission {id} in state {status}")]
    NotDeletable { id: Uuid, status: SubmissionStatus },

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: Uuid) -> Self {
        CoreError::NotFound { kind, id }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
