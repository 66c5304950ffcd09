//! Routes for story creation and retrieval.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get, routing::post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use adventure_core::error::DomainError;
use adventure_core::story::StoredNode;
use adventure_jobs::{runner, tracker};
use adventure_story::hydrate;

use super::job::StoryJobResponse;
use crate::error::ApiError;
use crate::state::AppState;

const SESSION_COOKIE: &str = "session_id";

/// Request body for POST /create.
#[derive(Debug, Deserialize)]
pub struct CreateStoryRequest {
    /// Free-text theme to generate a story from.
    pub theme: String,
}

/// One persisted node in a complete-story response.
#[derive(Debug, Serialize)]
pub struct StoryNodeResponse {
    /// Node identifier; keys of `all_nodes` and option targets.
    pub id: i64,
    /// Narrative text for this point in the story.
    pub content: String,
    /// True if this node has no outgoing options.
    pub is_ending: bool,
    /// True if this ending is a successful outcome.
    pub is_winning_ending: bool,
    /// Ordered outgoing options.
    pub options: Vec<StoryOptionResponse>,
}

/// One option in a complete-story response.
#[derive(Debug, Serialize)]
pub struct StoryOptionResponse {
    /// The choice text shown to the reader.
    pub text: String,
    /// Identifier of the node this choice leads to.
    pub node_id: i64,
}

/// Response body for GET /{story_id}/complete.
#[derive(Debug, Serialize)]
pub struct CompleteStoryResponse {
    /// Story identifier.
    pub id: i64,
    /// Story title.
    pub title: String,
    /// Opaque client session identifier.
    pub session_id: String,
    /// When the story was persisted.
    pub created_at: DateTime<Utc>,
    /// The root node.
    pub root_node: StoryNodeResponse,
    /// Every node of the story, keyed by identifier.
    pub all_nodes: HashMap<i64, StoryNodeResponse>,
}

fn node_response(node: &StoredNode) -> StoryNodeResponse {
    StoryNodeResponse {
        id: node.id,
        content: node.content.clone(),
        is_ending: node.is_ending,
        is_winning_ending: node.is_winning_ending,
        options: node
            .options
            .iter()
            .map(|option| StoryOptionResponse {
                text: option.text.clone(),
                node_id: option.node_id,
            })
            .collect(),
    }
}

/// Extracts the session identifier from the request's cookies, if any.
fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

/// POST /create
///
/// Persists a pending job, dispatches generation to run after this
/// response is sent, and returns the job handle immediately. The session
/// cookie is set so subsequent requests correlate to the same client.
#[instrument(skip(state, headers, request))]
async fn create_story(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateStoryRequest>,
) -> Result<Response, ApiError> {
    let session_id =
        session_from_headers(&headers).unwrap_or_else(|| Uuid::new_v4().to_string());

    let job = tracker::create_job(&*state.jobs, &*state.clock, &request.theme, &session_id)
        .await?;

    // Fire and forget: progress is observable only through the job record.
    runner::spawn_generation(
        state.jobs.clone(),
        state.generator.clone(),
        state.clock.clone(),
        job.job_id,
        job.theme.clone(),
        session_id.clone(),
    );

    info!(job_id = %job.job_id, "story generation dispatched");

    let cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly");
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|_| DomainError::Validation("invalid session identifier".into()))?;

    let mut response =
        (StatusCode::CREATED, Json(StoryJobResponse::from(job))).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// GET /{story_id}/complete
///
/// Serves a completed story. The stored nodes are hydrated first as an
/// integrity gate: a story whose options dangle or loop is a server fault,
/// not a payload.
#[instrument(skip(state))]
async fn get_complete_story(
    State(state): State<AppState>,
    Path(story_id): Path<i64>,
) -> Result<Json<CompleteStoryResponse>, ApiError> {
    let (record, nodes) = state.stories.load_story(story_id).await?;

    let root = nodes
        .iter()
        .find(|node| node.is_root)
        .ok_or_else(|| DomainError::Integrity(format!("story {story_id} has no root node")))?;
    hydrate(&nodes, root.id)?;

    Ok(Json(CompleteStoryResponse {
        id: record.id,
        title: record.title,
        session_id: record.session_id,
        created_at: record.created_at,
        root_node: node_response(root),
        all_nodes: nodes.iter().map(|node| (node.id, node_response(node))).collect(),
    }))
}

/// Returns the router for story creation and retrieval.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_story))
        .route("/{story_id}/complete", get(get_complete_story))
}
