//! Request handlers and router assembly.
//!
//! The repositories arrive through `State<Subsystems>`; handlers never reach
//! for globals.

use std::path::Path;
use std::time::Duration;

use axum::{
    extract::{Path as UrlPath, Query, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::lifecycle::Subsystems;
use crate::observability::{request_logger, LogSink};
use crate::storage::{Operation, OperationFilter};

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// Build the router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(subsystems: Subsystems, sink: LogSink, request_timeout: Duration) -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/api/v1/operations", get(list_operations))
        .route("/api/v1/operations/{id}", get(get_operation))
        .route("/images/markers/{name}", get(marker_image))
        .route("/images/ammo/{name}", get(ammo_image))
        .with_state(subsystems)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn_with_state(sink, request_logger))
        .layer(TraceLayer::new_for_http())
}

pub async fn healthcheck() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn list_operations(
    State(state): State<Subsystems>,
    Query(filter): Query<OperationFilter>,
) -> Result<Json<Vec<Operation>>, StatusCode> {
    let repo = state.operations.clone();
    let ops = tokio::task::spawn_blocking(move || repo.select(&filter))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Operation query task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "Operation query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    Ok(Json(ops))
}

pub async fn get_operation(
    State(state): State<Subsystems>,
    UrlPath(id): UrlPath<i64>,
) -> Result<Json<Operation>, StatusCode> {
    let repo = state.operations.clone();
    let op = tokio::task::spawn_blocking(move || repo.get(id))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Operation lookup task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            tracing::error!(id, error = %e, "Operation lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    op.map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn marker_image(State(state): State<Subsystems>, UrlPath(name): UrlPath<String>) -> Response {
    match state.markers.get(&name) {
        Some(path) => send_image(path).await,
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn ammo_image(State(state): State<Subsystems>, UrlPath(name): UrlPath<String>) -> Response {
    match state.ammo.get(&name) {
        Some(path) => send_image(path).await,
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn send_image(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(path))], bytes).into_response(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read image");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
