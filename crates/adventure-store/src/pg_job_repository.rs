//! `PostgreSQL` implementation of the `JobRepository` trait.
//!
//! Every transition is a single guarded statement: the status predicate in
//! the WHERE clause enforces the job state machine at the storage layer,
//! so a terminal row can never be rewritten even by a racing worker.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use adventure_core::error::DomainError;
use adventure_core::job::{JobRecord, JobStatus};
use adventure_core::repository::JobRepository;

/// PostgreSQL-backed job repository.
#[derive(Debug, Clone)]
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    /// Creates a new `PgJobRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn persistence(err: sqlx::Error) -> DomainError {
    DomainError::Persistence(err.to_string())
}

#[async_trait]
impl JobRepository for PgJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.job_id))]
    async fn insert_job(&self, job: &JobRecord) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO story_jobs (job_id, session_id, theme, status, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(job.job_id)
        .bind(&job.session_id)
        .bind(&job.theme)
        .bind(job.status.as_str())
        .bind(job.created_at)
        .execute(&self.pool)
        .await
        .map_err(persistence)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_job(&self, job_id: Uuid) -> Result<JobRecord, DomainError> {
        let row = sqlx::query(
            "SELECT job_id, session_id, theme, status, story_id, created_at, completed_at, error
             FROM story_jobs
             WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence)?;

        let Some(row) = row else {
            return Err(DomainError::job_not_found(job_id));
        };

        let status = JobStatus::from_str(row.get::<&str, _>("status"))
            .map_err(|e| DomainError::Persistence(e.to_string()))?;

        Ok(JobRecord {
            job_id: row.get("job_id"),
            session_id: row.get("session_id"),
            theme: row.get("theme"),
            status,
            story_id: row.get("story_id"),
            created_at: row.get("created_at"),
            completed_at: row.get("completed_at"),
            error: row.get("error"),
        })
    }

    #[instrument(skip(self))]
    async fn mark_processing(&self, job_id: Uuid) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE story_jobs SET status = 'processing'
             WHERE job_id = $1 AND status = 'pending'",
        )
        .bind(job_id)
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Persistence(format!(
                "no pending job {job_id} to mark processing"
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_completed(
        &self,
        job_id: Uuid,
        story_id: i64,
        completed_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE story_jobs
             SET status = 'completed', story_id = $2, completed_at = $3
             WHERE job_id = $1 AND status = 'processing'",
        )
        .bind(job_id)
        .bind(story_id)
        .bind(completed_at)
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Persistence(format!(
                "no processing job {job_id} to mark completed"
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, error))]
    async fn mark_failed(
        &self,
        job_id: Uuid,
        error: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE story_jobs
             SET status = 'failed', error = $2, completed_at = $3
             WHERE job_id = $1 AND status = 'processing'",
        )
        .bind(job_id)
        .bind(error)
        .bind(completed_at)
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Persistence(format!(
                "no processing job {job_id} to mark failed"
            )));
        }
        Ok(())
    }
}
