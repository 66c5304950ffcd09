//! Test repositories — in-memory and failing implementations of the
//! persistence traits.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use adventure_core::error::DomainError;
use adventure_core::job::{JobRecord, JobStatus};
use adventure_core::repository::{JobRepository, StoryRepository};
use adventure_core::story::{FlatNode, StoredNode, StoryRecord};
use adventure_story::bind_ids;

/// An in-memory story repository with sequential id assignment.
///
/// Uses the same `bind_ids` mapping as the PostgreSQL repository, so the
/// flat-to-stored step behaves identically in tests and production.
#[derive(Debug, Default)]
pub struct InMemoryStoryRepository {
    inner: Mutex<StoryStore>,
}

#[derive(Debug, Default)]
struct StoryStore {
    next_story_id: i64,
    next_node_id: i64,
    stories: HashMap<i64, (StoryRecord, Vec<StoredNode>)>,
}

impl InMemoryStoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stories currently persisted.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn story_count(&self) -> usize {
        self.inner.lock().unwrap().stories.len()
    }
}

#[async_trait]
impl StoryRepository for InMemoryStoryRepository {
    async fn save_story(
        &self,
        title: &str,
        session_id: &str,
        created_at: DateTime<Utc>,
        nodes: &[FlatNode],
    ) -> Result<i64, DomainError> {
        let mut store = self.inner.lock().unwrap();

        store.next_story_id += 1;
        let story_id = store.next_story_id;

        let first_node_id = store.next_node_id + 1;
        #[allow(clippy::cast_possible_wrap)]
        let ids: Vec<i64> = (0..nodes.len() as i64).map(|n| first_node_id + n).collect();
        store.next_node_id = ids.last().copied().unwrap_or(store.next_node_id);

        let stored = bind_ids(nodes, &ids)?;
        let record = StoryRecord {
            id: story_id,
            title: title.to_owned(),
            session_id: session_id.to_owned(),
            created_at,
        };
        store.stories.insert(story_id, (record, stored));

        Ok(story_id)
    }

    async fn load_story(
        &self,
        story_id: i64,
    ) -> Result<(StoryRecord, Vec<StoredNode>), DomainError> {
        self.inner
            .lock()
            .unwrap()
            .stories
            .get(&story_id)
            .cloned()
            .ok_or_else(|| DomainError::story_not_found(story_id))
    }
}

/// An in-memory job repository that enforces the status state machine and
/// records every status a job has held, in order.
#[derive(Debug, Default)]
pub struct InMemoryJobRepository {
    inner: Mutex<JobStore>,
}

#[derive(Debug, Default)]
struct JobStore {
    jobs: HashMap<Uuid, JobRecord>,
    history: HashMap<Uuid, Vec<JobStatus>>,
}

impl InMemoryJobRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every status `job_id` has held, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn status_history(&self, job_id: Uuid) -> Vec<JobStatus> {
        self.inner
            .lock()
            .unwrap()
            .history
            .get(&job_id)
            .cloned()
            .unwrap_or_default()
    }

    fn transition(
        &self,
        job_id: Uuid,
        next: JobStatus,
        mutate: impl FnOnce(&mut JobRecord),
    ) -> Result<(), DomainError> {
        let mut store = self.inner.lock().unwrap();
        let job = store
            .jobs
            .get_mut(&job_id)
            .ok_or_else(|| DomainError::job_not_found(job_id))?;

        if !job.status.can_transition(next) {
            return Err(DomainError::Persistence(format!(
                "illegal transition {} -> {} for job {job_id}",
                job.status, next
            )));
        }

        job.status = next;
        mutate(job);
        store.history.entry(job_id).or_default().push(next);
        Ok(())
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn insert_job(&self, job: &JobRecord) -> Result<(), DomainError> {
        let mut store = self.inner.lock().unwrap();
        if store.jobs.contains_key(&job.job_id) {
            return Err(DomainError::Persistence(format!(
                "job {} already exists",
                job.job_id
            )));
        }
        store.jobs.insert(job.job_id, job.clone());
        store.history.insert(job.job_id, vec![job.status]);
        Ok(())
    }

    async fn get_job(&self, job_id: Uuid) -> Result<JobRecord, DomainError> {
        self.inner
            .lock()
            .unwrap()
            .jobs
            .get(&job_id)
            .cloned()
            .ok_or_else(|| DomainError::job_not_found(job_id))
    }

    async fn mark_processing(&self, job_id: Uuid) -> Result<(), DomainError> {
        self.transition(job_id, JobStatus::Processing, |_| {})
    }

    async fn mark_completed(
        &self,
        job_id: Uuid,
        story_id: i64,
        completed_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.transition(job_id, JobStatus::Completed, |job| {
            job.story_id = Some(story_id);
            job.completed_at = Some(completed_at);
        })
    }

    async fn mark_failed(
        &self,
        job_id: Uuid,
        error: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.transition(job_id, JobStatus::Failed, |job| {
            job.error = Some(error.to_owned());
            job.completed_at = Some(completed_at);
        })
    }
}

/// A story repository that always fails. Useful for testing persistence
/// error paths.
#[derive(Debug)]
pub struct FailingStoryRepository;

#[async_trait]
impl StoryRepository for FailingStoryRepository {
    async fn save_story(
        &self,
        _title: &str,
        _session_id: &str,
        _created_at: DateTime<Utc>,
        _nodes: &[FlatNode],
    ) -> Result<i64, DomainError> {
        Err(DomainError::Persistence("connection refused".into()))
    }

    async fn load_story(
        &self,
        _story_id: i64,
    ) -> Result<(StoryRecord, Vec<StoredNode>), DomainError> {
        Err(DomainError::Persistence("connection refused".into()))
    }
}

/// A job repository that always fails. Useful for testing persistence
/// error paths.
#[derive(Debug)]
pub struct FailingJobRepository;

#[async_trait]
impl JobRepository for FailingJobRepository {
    async fn insert_job(&self, _job: &JobRecord) -> Result<(), DomainError> {
        Err(DomainError::Persistence("connection refused".into()))
    }

    async fn get_job(&self, _job_id: Uuid) -> Result<JobRecord, DomainError> {
        Err(DomainError::Persistence("connection refused".into()))
    }

    async fn mark_processing(&self, _job_id: Uuid) -> Result<(), DomainError> {
        Err(DomainError::Persistence("connection refused".into()))
    }

    async fn mark_completed(
        &self,
        _job_id: Uuid,
        _story_id: i64,
        _completed_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        Err(DomainError::Persistence("connection refused".into()))
    }

    async fn mark_failed(
        &self,
        _job_id: Uuid,
        _error: &str,
        _completed_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        Err(DomainError::Persistence("connection refused".into()))
    }
}
