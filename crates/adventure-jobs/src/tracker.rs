//! Job creation and lookup handlers.

use tracing::info;
use uuid::Uuid;

use adventure_core::clock::Clock;
use adventure_core::error::DomainError;
use adventure_core::job::JobRecord;
use adventure_core::repository::JobRepository;

/// Creates and persists a pending job for `theme`.
///
/// Runs synchronously with the client request; the caller dispatches the
/// asynchronous work separately once the record exists.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the theme is blank and
/// `DomainError::Persistence` if the insert fails.
pub async fn create_job(
    jobs: &dyn JobRepository,
    clock: &dyn Clock,
    theme: &str,
    session_id: &str,
) -> Result<JobRecord, DomainError> {
    let theme = theme.trim();
    if theme.is_empty() {
        return Err(DomainError::Validation("theme must not be empty".into()));
    }

    let job = JobRecord::new(Uuid::new_v4(), session_id, theme, clock.now());
    jobs.insert_job(&job).await?;

    info!(job_id = %job.job_id, "job created");
    Ok(job)
}

/// Loads a job by identifier. Read-only and safe to call repeatedly.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown identifier.
pub async fn get_job(jobs: &dyn JobRepository, job_id: Uuid) -> Result<JobRecord, DomainError> {
    jobs.get_job(job_id).await
}
