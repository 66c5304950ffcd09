//! Shared application state.

use std::sync::Arc;

use adventure_core::clock::Clock;
use adventure_core::repository::{JobRepository, StoryRepository};
use adventure_engine::StoryGenerator;

/// Application state shared across all request handlers.
///
/// Constructed once at process start and injected everywhere; nothing in
/// the system reaches for ambient globals.
#[derive(Clone)]
pub struct AppState {
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Story persistence.
    pub stories: Arc<dyn StoryRepository>,
    /// Job persistence.
    pub jobs: Arc<dyn JobRepository>,
    /// The generation engine invoked by the background runner.
    pub generator: Arc<StoryGenerator>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        stories: Arc<dyn StoryRepository>,
        jobs: Arc<dyn JobRepository>,
        generator: Arc<StoryGenerator>,
    ) -> Self {
        Self {
            clock,
            stories,
            jobs,
            generator,
        }
    }
}
