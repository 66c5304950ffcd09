//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use adventure_api::routes;
use adventure_api::state::AppState;
use adventure_core::clock::Clock;
use adventure_core::narrator::Narrator;
use adventure_engine::StoryGenerator;
use adventure_test_support::{
    FixedClock, InMemoryJobRepository, InMemoryStoryRepository, fixed_time,
};

/// A full application wired to in-memory repositories, plus handles to
/// those repositories for direct assertions.
pub struct TestApp {
    pub router: Router,
    pub jobs: Arc<InMemoryJobRepository>,
    pub stories: Arc<InMemoryStoryRepository>,
}

/// Build the full app router with a deterministic clock and the given
/// narrator. Uses the same route structure as `main.rs`.
pub fn build_test_app(narrator: Arc<dyn Narrator>) -> TestApp {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(fixed_time()));
    let stories = Arc::new(InMemoryStoryRepository::new());
    let jobs = Arc::new(InMemoryJobRepository::new());
    let generator = Arc::new(StoryGenerator::new(narrator, stories.clone(), clock.clone()));
    let app_state = AppState::new(clock, stories.clone(), jobs.clone(), generator);

    let router = Router::new()
        .merge(routes::health::router())
        .nest("/api/stories", routes::story::router())
        .nest("/api/jobs", routes::job::router())
        .with_state(app_state);

    TestApp {
        router,
        jobs,
        stories,
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, headers, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request carrying a session cookie.
pub async fn post_json_with_cookie(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
    session_id: &str,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("cookie", format!("session_id={session_id}"))
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let (status, _, json) = send(app, request).await;
    (status, json)
}

/// Poll the job endpoint until the job reaches a terminal state.
///
/// # Panics
///
/// Panics if the job is still running after the last retry.
pub async fn poll_job_until_terminal(app: &TestApp, job_id: &str) -> serde_json::Value {
    for _ in 0..200 {
        let (status, json) = get_json(app.router.clone(), &format!("/api/jobs/{job_id}")).await;
        assert_eq!(status, StatusCode::OK);

        match json["status"].as_str().unwrap() {
            "completed" | "failed" => return json,
            "pending" | "processing" => {}
            other => panic!("unexpected job status {other}"),
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job {job_id} did not reach a terminal state");
}
