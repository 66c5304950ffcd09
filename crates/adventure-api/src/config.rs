//! Server configuration read from the environment at startup.

use crate::error::AppError;

/// Configuration for the API server process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// API key for the text-generation service.
    pub gemini_api_key: String,
    /// Model used for story generation.
    pub gemini_model: String,
}

impl AppConfig {
    /// Reads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `DATABASE_URL` or `GEMINI_API_KEY` is
    /// missing, or `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| AppError::Config("DATABASE_URL environment variable must be set".into()))?;
        let gemini_api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            AppError::Config("GEMINI_API_KEY environment variable must be set".into())
        })?;
        let gemini_model = std::env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| adventure_engine::gemini::DEFAULT_MODEL.to_owned());
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

        Ok(Self {
            database_url,
            host,
            port,
            gemini_api_key,
            gemini_model,
        })
    }
}
