use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::rbac::Action;
use crate::auth::RequestContext;
use crate::error::ApiResult;
use crate::http::response;
use crate::http::state::AppState;
use crate::services::instance::VolumeMount;

const RESOURCE: &str = "instances";
const DEFAULT_LOG_TAIL: usize = 100;

#[derive(Deserialize)]
pub struct VolumeMountRequest {
    volume_id: Uuid,
    mount_path: String,
}

#[derive(Deserialize)]
pub struct LaunchRequest {
    name: String,
    image: String,
    #[serde(default)]
    ports: String,
    vpc_id: Option<Uuid>,
    #[serde(default)]
    volumes: Vec<VolumeMountRequest>,
}

pub async fn launch(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<LaunchRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Create)?;
    let volumes = body
        .volumes
        .into_iter()
        .map(|v| VolumeMount {
            volume_id: v.volume_id,
            mount_path: v.mount_path,
        })
        .collect();
    let instance = state
        .instances
        .launch(ctx.user_id, &body.name, &body.image, &body.ports, body.vpc_id, volumes)
        .await?;
    Ok(response::created(instance))
}

pub async fn list(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let instances = state.instances.list(ctx.user_id).await?;
    Ok(response::ok(instances))
}

pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let instance = state.instances.get(&id, ctx.user_id).await?;
    Ok(response::ok(instance))
}

pub async fn terminate(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Delete)?;
    state.instances.terminate(&id, ctx.user_id).await?;
    Ok(response::no_content())
}

pub async fn stop(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Update)?;
    let instance = state.instances.stop(&id, ctx.user_id).await?;
    Ok(response::ok(instance))
}

#[derive(Deserialize)]
pub struct LogsQuery {
    tail: Option<usize>,
}

pub async fn logs(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Query(query): Query<LogsQuery>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let logs = state
        .instances
        .logs(&id, ctx.user_id, query.tail.unwrap_or(DEFAULT_LOG_TAIL))
        .await?;
    Ok(response::ok(logs))
}

pub async fn stats(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let state_kind = state.instances.engine_state(&id, ctx.user_id).await?;
    Ok(response::ok(format!("{state_kind:?}")))
}
