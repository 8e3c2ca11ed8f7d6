use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::engine::EngineError;
use crate::http::state::AppState;

/// Service index, matching the teacher's `root_handler`.
pub async fn root() -> impl IntoResponse {
    axum::Json(json!({
        "service": "thecloud-server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/health", "/ready", "/metrics"],
    }))
}

pub async fn health() -> impl IntoResponse {
    axum::Json(json!({ "status": "ok" }))
}

/// Readiness probe: pings the DB pool (via a cheap repository read) and the
/// container engine (a lookup on a container that cannot exist — a
/// `ContainerNotFound` reply means the engine connection itself is healthy,
/// anything else means it isn't), alongside the static `/health` check.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state.repos.events.list_recent(1).await.is_ok();
    let engine_ok = match state.engine.fetch_logs("__readiness_probe__", 0).await {
        Ok(_) | Err(EngineError::ContainerNotFound(_)) => true,
        Err(_) => false,
    };

    let body = json!({ "db": db_ok, "engine": engine_ok });
    if db_ok && engine_ok {
        (StatusCode::OK, axum::Json(body))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, axum::Json(body))
    }
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
