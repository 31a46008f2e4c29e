//! HTTP surface: `POST /run`, `GET /read`, `GET /health`.

use axum::extract::{OriginalUri, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::dispatch::{Dispatcher, Outcome};
use crate::error::ApiError;
use crate::reader::FileReader;

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub reader: FileReader,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, reader: FileReader) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            reader,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RunParams {
    pub task: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReadParams {
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/run", post(run_task))
        .route("/read", get(read_file))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn run_task(
    State(state): State<AppState>,
    Query(params): Query<RunParams>,
) -> Result<Json<MessageResponse>, ApiError> {
    let task = params.task.unwrap_or_default();
    match state.dispatcher.handle(&task).await {
        Outcome::Completed { message, .. } => Ok(Json(MessageResponse { message })),
        Outcome::Unrecognized => Err(ApiError::Unrecognized),
        Outcome::Failed { error, .. } => Err(ApiError::Execution(error)),
    }
}

async fn read_file(
    State(state): State<AppState>,
    Query(params): Query<ReadParams>,
) -> Result<Json<ContentResponse>, ApiError> {
    let path = params.path.ok_or(ApiError::MissingParameter("path"))?;
    let content = state.reader.read(&path).await?;
    Ok(Json(ContentResponse { content }))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn not_found(uri: OriginalUri) -> ApiError {
    ApiError::NoRoute(uri.0.path().to_string())
}
