//! Adventure — Job Tracker.
//!
//! Makes story generation observable: each request becomes a job record
//! whose status the client polls while an asynchronous task does the slow
//! work. The record is the sole source of truth for progress; the
//! dispatching request holds no other reference to the task.

pub mod runner;
pub mod tracker;
