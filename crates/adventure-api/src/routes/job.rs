//! Routes for job-status polling.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use adventure_core::job::{JobRecord, JobStatus};
use adventure_jobs::tracker;

use crate::error::ApiError;
use crate::state::AppState;

/// Response body mirroring one job record.
#[derive(Debug, Serialize)]
pub struct StoryJobResponse {
    /// Unique job identifier.
    pub job_id: Uuid,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// The generated story, set only once completed.
    pub story_id: Option<i64>,
    /// When the job reached a terminal state.
    pub completed_at: Option<DateTime<Utc>>,
    /// Sanitized failure cause, set only on failure.
    pub error: Option<String>,
}

impl From<JobRecord> for StoryJobResponse {
    fn from(job: JobRecord) -> Self {
        Self {
            job_id: job.job_id,
            status: job.status,
            created_at: job.created_at,
            story_id: job.story_id,
            completed_at: job.completed_at,
            error: job.error,
        }
    }
}

/// GET /{job_id}
#[instrument(skip(state))]
async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<StoryJobResponse>, ApiError> {
    let job = tracker::get_job(&*state.jobs, job_id).await?;
    Ok(Json(job.into()))
}

/// Returns the router for job polling.
pub fn router() -> Router<AppState> {
    Router::new().route("/{job_id}", get(get_job_status))
}
