//! Test narrators — deterministic `Narrator` implementations.

use std::sync::Mutex;

use async_trait::async_trait;

use adventure_core::error::DomainError;
use adventure_core::narrator::Narrator;

/// A narrator that returns a fixed completion on every call and records
/// the prompts it received.
#[derive(Debug)]
pub struct ScriptedNarrator {
    output: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedNarrator {
    /// Creates a narrator that always completes with `output`.
    #[must_use]
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all prompts received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Narrator for ScriptedNarrator {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        Ok(self.output.clone())
    }
}

/// A narrator that always fails. Useful for testing the generation error
/// path end to end.
#[derive(Debug)]
pub struct FailingNarrator;

#[async_trait]
impl Narrator for FailingNarrator {
    async fn complete(&self, _prompt: &str) -> Result<String, DomainError> {
        Err(DomainError::Generation("service unavailable".into()))
    }
}
