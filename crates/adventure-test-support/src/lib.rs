//! Shared test doubles and fixtures for the Adventure story service.

mod clock;
mod fixtures;
mod narrator;
mod repository;

pub use clock::{FixedClock, fixed_time};
pub use fixtures::VALID_STORY_JSON;
pub use narrator::{FailingNarrator, ScriptedNarrator};
pub use repository::{
    FailingJobRepository, FailingStoryRepository, InMemoryJobRepository, InMemoryStoryRepository,
};
