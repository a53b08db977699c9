//! Storage fault taxonomy.

use thiserror::Error;

/// Infrastructure-level storage failure.
///
/// Distinct from the credit error taxonomy: these are backend faults, not
/// business outcomes, and are surfaced to HTTP clients as a generic failure
/// without internal detail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The requested record does not exist.
    #[error("record not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Connectivity or query failure in the backend.
    #[error("backend failure: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
