//! Story generation orchestration.

use std::sync::Arc;

use tracing::{info, instrument};

use adventure_core::clock::Clock;
use adventure_core::error::DomainError;
use adventure_core::narrator::Narrator;
use adventure_core::repository::StoryRepository;
use adventure_story::{flatten, validate};

use crate::parse;
use crate::prompt;

/// Orchestrates one story's creation from a theme to a persisted tree.
///
/// Generation is the single riskiest external call in the system, so
/// validation runs immediately after parsing: a malformed tree never
/// reaches storage.
pub struct StoryGenerator {
    narrator: Arc<dyn Narrator>,
    stories: Arc<dyn StoryRepository>,
    clock: Arc<dyn Clock>,
}

impl StoryGenerator {
    /// Creates a new generator over the given collaborators.
    #[must_use]
    pub fn new(
        narrator: Arc<dyn Narrator>,
        stories: Arc<dyn StoryRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            narrator,
            stories,
            clock,
        }
    }

    /// Generates, validates, and persists one story for `theme`.
    ///
    /// Returns the persisted story's identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Generation` if the service call fails,
    /// `DomainError::Parse` if its output is not story-shaped,
    /// `DomainError::Structure` if the parsed tree violates an invariant,
    /// and `DomainError::Persistence` if the save fails. None of these are
    /// retried here.
    #[instrument(skip(self), fields(theme = %theme))]
    pub async fn generate(&self, theme: &str, session_id: &str) -> Result<i64, DomainError> {
        let instruction = prompt::story_prompt(theme);
        let raw = self.narrator.complete(&instruction).await?;

        let tree = parse::parse_story_tree(&raw)?;
        validate(&tree)?;

        let nodes = flatten(&tree);
        let story_id = self
            .stories
            .save_story(&tree.title, session_id, self.clock.now(), &nodes)
            .await?;

        info!(story_id, node_count = nodes.len(), "story persisted");
        Ok(story_id)
    }
}
