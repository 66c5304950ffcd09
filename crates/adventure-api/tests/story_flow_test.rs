//! Integration tests for the story generation flow: create a job, poll it,
//! fetch the completed story.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::Value;
use uuid::Uuid;

use adventure_test_support::{FailingNarrator, ScriptedNarrator, VALID_STORY_JSON};

#[tokio::test]
async fn test_create_job_then_poll_to_completion_then_fetch_story() {
    let app = common::build_test_app(Arc::new(ScriptedNarrator::new(VALID_STORY_JSON)));

    // POST /api/stories/create — the response is immediate and pending.
    let (status, headers, created) = common::post_json_with_cookie(
        app.router.clone(),
        "/api/stories/create",
        &serde_json::json!({ "theme": "space pirates" }),
        "session-abc",
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["story_id"], Value::Null);
    assert_eq!(created["completed_at"], Value::Null);
    assert_eq!(created["error"], Value::Null);
    assert!(headers.get("set-cookie").is_some());

    let job_id = created["job_id"].as_str().unwrap().to_owned();

    // An immediate poll may land anywhere in the lifecycle; the terminal
    // state must be completed.
    let job = common::poll_job_until_terminal(&app, &job_id).await;
    assert_eq!(job["status"], "completed");
    assert_eq!(job["error"], Value::Null);
    assert!(job["completed_at"].is_string());
    let story_id = job["story_id"].as_i64().expect("completed job has a story id");

    // GET /api/stories/{id}/complete — the full tree.
    let (status, story) = common::get_json(
        app.router.clone(),
        &format!("/api/stories/{story_id}/complete"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(story["id"].as_i64(), Some(story_id));
    assert_eq!(story["title"], "Mutiny on the Red Comet");
    assert_eq!(story["session_id"], "session-abc");

    let all_nodes = story["all_nodes"].as_object().unwrap();
    let root = &story["root_node"];
    assert_eq!(
        all_nodes[&root["id"].as_i64().unwrap().to_string()]["content"],
        root["content"]
    );

    // Every option target resolves to a key of all_nodes, and every node
    // honors the branching invariants.
    for node in all_nodes.values() {
        let options = node["options"].as_array().unwrap();
        if node["is_ending"].as_bool().unwrap() {
            assert!(options.is_empty());
        } else {
            assert!((2..=3).contains(&options.len()));
        }
        for option in options {
            let target = option["node_id"].as_i64().unwrap();
            assert!(all_nodes.contains_key(&target.to_string()));
        }
    }
}

#[tokio::test]
async fn test_polling_a_terminal_job_is_idempotent() {
    let app = common::build_test_app(Arc::new(ScriptedNarrator::new(VALID_STORY_JSON)));

    let (_, _, created) = common::post_json(
        app.router.clone(),
        "/api/stories/create",
        &serde_json::json!({ "theme": "space pirates" }),
    )
    .await;
    let job_id = created["job_id"].as_str().unwrap().to_owned();

    let first = common::poll_job_until_terminal(&app, &job_id).await;
    let (status, second) =
        common::get_json(app.router.clone(), &format!("/api/jobs/{job_id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_malformed_generation_output_fails_job_without_story() {
    let app =
        common::build_test_app(Arc::new(ScriptedNarrator::new("```json\n{\"title\": \"bro")));

    let (status, _, created) = common::post_json(
        app.router.clone(),
        "/api/stories/create",
        &serde_json::json!({ "theme": "space pirates" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let job_id = created["job_id"].as_str().unwrap().to_owned();
    let job = common::poll_job_until_terminal(&app, &job_id).await;

    assert_eq!(job["status"], "failed");
    assert_eq!(job["story_id"], Value::Null);
    assert!(job["completed_at"].is_string());
    assert!(!job["error"].as_str().unwrap().is_empty());

    // No partial story is ever visible.
    assert_eq!(app.stories.story_count(), 0);
}

#[tokio::test]
async fn test_generation_service_failure_fails_job() {
    let app = common::build_test_app(Arc::new(FailingNarrator));

    let (_, _, created) = common::post_json(
        app.router.clone(),
        "/api/stories/create",
        &serde_json::json!({ "theme": "space pirates" }),
    )
    .await;

    let job_id = created["job_id"].as_str().unwrap().to_owned();
    let job = common::poll_job_until_terminal(&app, &job_id).await;

    assert_eq!(job["status"], "failed");
    assert_eq!(job["error"], "the story service did not produce a story");
    assert_eq!(app.stories.story_count(), 0);
}

#[tokio::test]
async fn test_unknown_job_and_story_return_404() {
    let app = common::build_test_app(Arc::new(ScriptedNarrator::new(VALID_STORY_JSON)));

    let (status, json) = common::get_json(
        app.router.clone(),
        &format!("/api/jobs/{}", Uuid::new_v4()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");

    let (status, json) =
        common::get_json(app.router.clone(), "/api/stories/999/complete").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_blank_theme_is_rejected_before_any_job_exists() {
    let app = common::build_test_app(Arc::new(ScriptedNarrator::new(VALID_STORY_JSON)));

    let (status, _, json) = common::post_json(
        app.router.clone(),
        "/api/stories/create",
        &serde_json::json!({ "theme": "" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}
