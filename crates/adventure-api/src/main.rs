//! Adventure story API server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use adventure_core::clock::{Clock, SystemClock};
use adventure_core::narrator::Narrator;
use adventure_core::repository::{JobRepository, StoryRepository};
use adventure_engine::{GeminiNarrator, StoryGenerator};
use adventure_store::{PgJobRepository, PgStoryRepository};

use adventure_api::{config, routes, state};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Adventure story API server");

    // Read configuration from environment.
    let config = config::AppConfig::from_env()?;

    // Create database connection pool and bring the schema up to date.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    // Build application state: every collaborator is constructed once here
    // and injected; nothing is ambient.
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let stories: Arc<dyn StoryRepository> = Arc::new(PgStoryRepository::new(pool.clone()));
    let jobs: Arc<dyn JobRepository> = Arc::new(PgJobRepository::new(pool));
    let narrator: Arc<dyn Narrator> = Arc::new(GeminiNarrator::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));
    let generator = Arc::new(StoryGenerator::new(
        narrator,
        stories.clone(),
        clock.clone(),
    ));
    let app_state = state::AppState::new(clock, stories, jobs, generator);

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/stories", routes::story::router())
        .nest("/api/jobs", routes::job::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("invalid HOST:PORT combination: {e}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
