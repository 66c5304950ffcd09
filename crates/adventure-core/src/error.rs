//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Every fallible operation in the system classifies its failure into one
/// of these variants. The asynchronous generation runner uses the variant
/// to decide the sanitized cause recorded on a failed job.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The external text-generation service failed, timed out, or refused.
    #[error("generation error: {0}")]
    Generation(String),

    /// The service output did not match the expected story shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// A parsed story tree violates a structural invariant.
    #[error("structure error: {0}")]
    Structure(String),

    /// A persisted node collection is internally inconsistent.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// A storage read or write failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A request carried invalid input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A job or story was not found.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// The kind of resource looked up ("job" or "story").
        resource: &'static str,
        /// The identifier that did not resolve.
        id: String,
    },
}

impl DomainError {
    /// Builds a `NotFound` error for a job identifier.
    #[must_use]
    pub fn job_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            resource: "job",
            id: id.to_string(),
        }
    }

    /// Builds a `NotFound` error for a story identifier.
    #[must_use]
    pub fn story_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            resource: "story",
            id: id.to_string(),
        }
    }
}
