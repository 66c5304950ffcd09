//! Job record and status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lifecycle state of a story generation job.
///
/// The only legal paths are `Pending → Processing → Completed` and
/// `Pending → Processing → Failed`. A job never moves from `Pending`
/// directly to a terminal state, and terminal states are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Created synchronously with the request; not yet picked up.
    Pending,
    /// The asynchronous worker has started generation.
    Processing,
    /// Generation and persistence succeeded.
    Completed,
    /// Generation or persistence failed; the cause is recorded on the job.
    Failed,
}

impl JobStatus {
    /// Returns the storage representation of this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the transition from `self` to `next` is legal.
    #[must_use]
    pub fn can_transition(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is not recognized.
#[derive(Debug, Error)]
#[error("unknown job status: {0}")]
pub struct ParseJobStatusError(pub String);

impl std::str::FromStr for JobStatus {
    type Err = ParseJobStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(ParseJobStatusError(other.to_owned())),
        }
    }
}

/// One tracked story generation request.
///
/// The job record is the sole source of truth for generation progress; the
/// story row does not exist until generation succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    /// Unique, client-facing job identifier.
    pub job_id: Uuid,
    /// Opaque client session identifier.
    pub session_id: String,
    /// The free-text theme the story is generated from.
    pub theme: String,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// The generated story, set only on `Completed`.
    pub story_id: Option<i64>,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// When the job reached a terminal state.
    pub completed_at: Option<DateTime<Utc>>,
    /// Sanitized failure cause, set only on `Failed`.
    pub error: Option<String>,
}

impl JobRecord {
    /// Creates a new pending job.
    #[must_use]
    pub fn new(
        job_id: Uuid,
        session_id: impl Into<String>,
        theme: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            job_id,
            session_id: session_id.into(),
            theme: theme.into(),
            status: JobStatus::Pending,
            story_id: None,
            created_at,
            completed_at: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_legal_transitions() {
        assert!(JobStatus::Pending.can_transition(JobStatus::Processing));
        assert!(JobStatus::Processing.can_transition(JobStatus::Completed));
        assert!(JobStatus::Processing.can_transition(JobStatus::Failed));
    }

    #[test]
    fn test_pending_cannot_fail_directly() {
        // Failure must record the processing state first.
        assert!(!JobStatus::Pending.can_transition(JobStatus::Failed));
        assert!(!JobStatus::Pending.can_transition(JobStatus::Completed));
    }

    #[test]
    fn test_terminal_states_are_immutable() {
        for terminal in [JobStatus::Completed, JobStatus::Failed] {
            for next in [
                JobStatus::Pending,
                JobStatus::Processing,
                JobStatus::Completed,
                JobStatus::Failed,
            ] {
                assert!(!terminal.can_transition(next));
            }
        }
    }

    #[test]
    fn test_status_round_trips_through_storage_form() {
        for status in [
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(JobStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(JobStatus::from_str("cancelled").is_err());
    }

    #[test]
    fn test_new_job_is_pending_with_empty_outcome() {
        let now = Utc::now();
        let job = JobRecord::new(Uuid::new_v4(), "session", "space pirates", now);

        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.story_id, None);
        assert_eq!(job.completed_at, None);
        assert_eq!(job.error, None);
        assert_eq!(job.created_at, now);
    }
}
