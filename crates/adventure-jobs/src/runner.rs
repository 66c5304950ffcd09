//! Asynchronous generation runner.
//!
//! The runner owns every job-state transition after creation. It runs in a
//! spawned task after the HTTP response has been sent, so each update uses
//! its own repository call (its own connection), never anything bound to
//! the finished request. Errors never escape the task: they are classified
//! and recorded as the job's terminal state.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use adventure_core::clock::Clock;
use adventure_core::error::DomainError;
use adventure_core::repository::JobRepository;
use adventure_engine::StoryGenerator;

/// Submits one generation run to the runtime and returns immediately.
///
/// The dispatching context does not wait and holds no reference to the
/// task's outcome; progress is observable only through the job record.
/// Once dispatched, the run goes to completion regardless of client
/// disconnection.
pub fn spawn_generation(
    jobs: Arc<dyn JobRepository>,
    generator: Arc<StoryGenerator>,
    clock: Arc<dyn Clock>,
    job_id: Uuid,
    theme: String,
    session_id: String,
) {
    drop(tokio::spawn(run_generation(
        jobs, generator, clock, job_id, theme, session_id,
    )));
}

/// Executes one generation run: processing, then completed or failed.
///
/// The processing mark always precedes a terminal state; a job is never
/// failed straight from pending. If even the processing mark cannot be
/// written the job is left pending and the fault is logged.
#[instrument(skip(jobs, generator, clock, theme, session_id), fields(job_id = %job_id))]
pub async fn run_generation(
    jobs: Arc<dyn JobRepository>,
    generator: Arc<StoryGenerator>,
    clock: Arc<dyn Clock>,
    job_id: Uuid,
    theme: String,
    session_id: String,
) {
    if let Err(err) = jobs.mark_processing(job_id).await {
        error!(error = %err, "could not mark job processing");
        return;
    }

    match generator.generate(&theme, &session_id).await {
        Ok(story_id) => match jobs.mark_completed(job_id, story_id, clock.now()).await {
            Ok(()) => info!(story_id, "job completed"),
            Err(err) => error!(error = %err, story_id, "could not mark job completed"),
        },
        Err(err) => {
            warn!(error = %err, "generation failed");
            let cause = failure_cause(&err);
            if let Err(update_err) = jobs.mark_failed(job_id, cause, clock.now()).await {
                error!(error = %update_err, "could not mark job failed");
            }
        }
    }
}

/// Maps an internal error to the sanitized cause recorded on the job.
/// Raw diagnostics stay in the logs; the client sees only the class.
fn failure_cause(err: &DomainError) -> &'static str {
    match err {
        DomainError::Generation(_) => "the story service did not produce a story",
        DomainError::Parse(_) => "the story service output could not be read",
        DomainError::Structure(_) => "the generated story was not a valid story",
        DomainError::Integrity(_) | DomainError::Persistence(_) => "the story could not be saved",
        DomainError::Validation(_) | DomainError::NotFound { .. } => "story generation failed",
    }
}
