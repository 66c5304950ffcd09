//! Adventure — PostgreSQL persistence.
//!
//! Maps story trees and job records to durable storage. Story saves are a
//! single transaction; job transitions are single guarded statements, each
//! its own unit of persistence, so the asynchronous runner never shares a
//! connection with a finished request.

pub mod pg_job_repository;
pub mod pg_story_repository;

pub use pg_job_repository::PgJobRepository;
pub use pg_story_repository::PgStoryRepository;
