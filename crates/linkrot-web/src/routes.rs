//! HTTP surface: `/check`, `/tasks`, `/result/{task_id}`.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tower_http::cors::CorsLayer;

use linkrot_core::cache::StatusCache;
use linkrot_core::classify::CheckOutcome;
use linkrot_core::refs::{sanitize_url, Reference};
use linkrot_core::result::TaskStatus;
use linkrot_core::status::check_url;

use crate::tasks::{self, TaskStore};

#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub store: Arc<TaskStore>,
    pub cache: Arc<StatusCache>,
    pub check_timeout: Duration,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/check", get(check))
        .route("/tasks", post(create_task))
        .route("/result/{task_id}", get(task_result))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct CheckParams {
    url: Option<String>,
}

/// `GET /check?url=<encoded>`: the numeric HTTP status of fetching `url`,
/// as plain text. Transport failures come back as `0`, which clients
/// classify into the `other` bucket.
async fn check(
    State(state): State<AppState>,
    Query(params): Query<CheckParams>,
) -> Result<String, StatusCode> {
    let Some(raw) = params.url else {
        return Err(StatusCode::BAD_REQUEST);
    };
    let url = sanitize_url(&raw);

    let outcome = match state.cache.get(&url) {
        Some(outcome) => outcome,
        None => {
            let outcome = check_url(&state.client, &url, state.check_timeout).await;
            state.cache.insert(&url, outcome);
            outcome
        }
    };

    let code = match outcome {
        CheckOutcome::Status(code) => code,
        CheckOutcome::TransportFailure => 0,
    };
    Ok(code.to_string())
}

#[derive(Deserialize)]
struct TaskRequest {
    #[serde(default)]
    metadata: Map<String, Value>,
    references: Vec<Reference>,
}

#[derive(Serialize)]
struct TaskCreated {
    task_id: String,
}

/// `POST /tasks`: register an analysis task and start checking its
/// references in the background. Responds immediately with the task id;
/// progress is observed through `/result/{task_id}`.
async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<TaskRequest>,
) -> (StatusCode, Json<TaskCreated>) {
    let task_id = state.store.create();
    log::info!(
        "task {task_id}: {} references queued",
        request.references.len()
    );
    tokio::spawn(tasks::run_task(
        state.store.clone(),
        state.client.clone(),
        state.cache.clone(),
        task_id.clone(),
        request.metadata,
        request.references,
        state.check_timeout,
    ));
    (StatusCode::ACCEPTED, Json(TaskCreated { task_id }))
}

/// `GET /result/{task_id}`: `{"successful": false}` while the task is
/// pending, the full payload once done, 404 for unknown ids.
async fn task_result(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskStatus>, StatusCode> {
    state.store.status(&task_id).map(Json).ok_or(StatusCode::NOT_FOUND)
}
