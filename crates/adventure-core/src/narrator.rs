//! Text-generation abstraction.
//!
//! The narrator is the single non-deterministic boundary in the system:
//! production code talks to a language-model API, tests substitute scripted
//! output. The raw completion is untrusted text; callers must parse and
//! validate it before extending any trust.

use async_trait::async_trait;

use crate::error::DomainError;

/// Abstraction over the external text-generation service.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Requests a completion for `prompt` and returns the raw text.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Generation` if the service fails, times out,
    /// or refuses the request.
    async fn complete(&self, prompt: &str) -> Result<String, DomainError>;
}
