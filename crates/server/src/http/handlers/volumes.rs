use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::rbac::Action;
use crate::auth::RequestContext;
use crate::error::ApiResult;
use crate::http::response;
use crate::http::state::AppState;

const RESOURCE: &str = "volumes";

#[derive(Deserialize)]
pub struct CreateVolumeRequest {
    name: String,
    size_gb: i32,
}

pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<CreateVolumeRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Create)?;
    let volume = state.volumes.create(ctx.user_id, &body.name, body.size_gb).await?;
    Ok(response::created(volume))
}

pub async fn list(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let volumes = state.volumes.list(ctx.user_id).await?;
    Ok(response::ok(volumes))
}

pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let volume = state.volumes.get(id).await?;
    Ok(response::ok(volume))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Delete)?;
    state.volumes.delete(id).await?;
    Ok(response::no_content())
}

#[derive(Deserialize)]
pub struct AttachRequest {
    instance_id: Uuid,
    mount_path: String,
}

pub async fn attach(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(body): Json<AttachRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Update)?;
    let volume = state.volumes.attach(id, body.instance_id, &body.mount_path).await?;
    Ok(response::ok(volume))
}

pub async fn detach(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Update)?;
    let volume = state.volumes.detach(id).await?;
    Ok(response::ok(volume))
}
