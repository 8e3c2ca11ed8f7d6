use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::rbac::Action;
use crate::auth::RequestContext;
use crate::error::ApiResult;
use crate::http::response;
use crate::http::state::AppState;

const RESOURCE: &str = "caches";

#[derive(Deserialize)]
pub struct CreateCacheRequest {
    name: String,
    engine: String,
    version: String,
    vpc_id: Option<Uuid>,
}

pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<CreateCacheRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Create)?;
    let cache = state
        .caches
        .create(ctx.user_id, &body.name, &body.engine, &body.version, body.vpc_id)
        .await?;
    Ok(response::created(cache))
}

pub async fn list(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let caches = state.caches.list(ctx.user_id).await?;
    Ok(response::ok(caches))
}

pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let cache = state.caches.get(id).await?;
    Ok(response::ok(cache))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Delete)?;
    state.caches.delete(id).await?;
    Ok(response::no_content())
}

pub async fn connection(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let cache = state.caches.get(id).await?;
    Ok(response::ok(state.caches.connection_string(&cache)))
}

pub async fn flush(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Update)?;
    state.caches.flush(id).await?;
    Ok(response::no_content())
}

pub async fn stats(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let cache = state.caches.get(id).await?;
    Ok(response::ok(cache.status))
}
