//! Gemini-backed implementation of the `Narrator` trait.
//!
//! Talks to the `generateContent` REST endpoint and requests a JSON
//! response MIME type so the model returns the story structure directly.
//! No timeout is enforced at this layer; a hung call blocks its job.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use adventure_core::error::DomainError;
use adventure_core::narrator::Narrator;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model when `GEMINI_MODEL` is not configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Client for the Gemini text-generation API.
pub struct GeminiNarrator {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiNarrator {
    /// Creates a narrator with an explicit API key and model.
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// Creates a narrator from `GEMINI_API_KEY` and optional `GEMINI_MODEL`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Generation` if the API key is not set.
    pub fn from_env() -> Result<Self, DomainError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| DomainError::Generation("GEMINI_API_KEY is not set".to_owned()))?;
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        Ok(Self::new(api_key, model))
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}:generateContent", self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

#[async_trait]
impl Narrator for GeminiNarrator {
    #[instrument(skip_all, fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Generation(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Generation(format!(
                "service returned {status}: {body}"
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Generation(format!("unreadable response: {e}")))?;

        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| {
                DomainError::Generation("service returned no completion".to_owned())
            })?;

        debug!(completion_len = text.len(), "received completion");
        Ok(text)
    }
}
