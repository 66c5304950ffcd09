//! Repository abstractions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::job::JobRecord;
use crate::story::{FlatNode, StoredNode, StoryRecord};

/// Repository for persisted stories and their node trees.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Persists a story header and its flattened nodes atomically: either
    /// the whole node set and the header are committed together, or
    /// nothing is. Returns the assigned story identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` on a storage failure and
    /// `DomainError::Integrity` if the flattened nodes are internally
    /// inconsistent.
    async fn save_story(
        &self,
        title: &str,
        session_id: &str,
        created_at: DateTime<Utc>,
        nodes: &[FlatNode],
    ) -> Result<i64, DomainError>;

    /// Loads a story header and all of its nodes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for an unknown identifier and
    /// `DomainError::Persistence` on a storage failure.
    async fn load_story(&self, story_id: i64)
    -> Result<(StoryRecord, Vec<StoredNode>), DomainError>;
}

/// Repository for job records.
///
/// Job writes are independent units of persistence, one per transition,
/// never batched with story writes: the asynchronous runner mutates the job
/// row after the originating request context has already returned.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Persists a freshly created pending job.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` on a storage failure.
    async fn insert_job(&self, job: &JobRecord) -> Result<(), DomainError>;

    /// Loads a job by identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for an unknown identifier and
    /// `DomainError::Persistence` on a storage failure.
    async fn get_job(&self, job_id: Uuid) -> Result<JobRecord, DomainError>;

    /// Transitions a pending job to processing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` if the job is not pending or the
    /// write fails.
    async fn mark_processing(&self, job_id: Uuid) -> Result<(), DomainError>;

    /// Transitions a processing job to completed, recording the story.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` if the job is not processing or
    /// the write fails.
    async fn mark_completed(
        &self,
        job_id: Uuid,
        story_id: i64,
        completed_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Transitions a processing job to failed, recording the cause.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` if the job is not processing or
    /// the write fails.
    async fn mark_failed(
        &self,
        job_id: Uuid,
        error: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;
}
