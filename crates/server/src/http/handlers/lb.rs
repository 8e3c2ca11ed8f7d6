use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::rbac::Action;
use crate::auth::RequestContext;
use crate::error::ApiResult;
use crate::http::response;
use crate::http::state::AppState;

const RESOURCE: &str = "loadbalancers";

#[derive(Deserialize)]
pub struct CreateLbRequest {
    name: String,
    vpc_id: Uuid,
    port: i32,
    algorithm: String,
    idempotency_key: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<CreateLbRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Create)?;
    let lb = state
        .lbs
        .create(ctx.user_id, &body.name, body.vpc_id, body.port, &body.algorithm, body.idempotency_key)
        .await?;
    Ok(response::created(lb))
}

pub async fn list(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let lbs = state.lbs.list(ctx.user_id).await?;
    Ok(response::ok(lbs))
}

pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let lb = state.lbs.get(id).await?;
    Ok(response::ok(lb))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Delete)?;
    state.lbs.delete(id).await?;
    Ok(response::no_content())
}

#[derive(Deserialize)]
pub struct AddTargetRequest {
    instance_id: Uuid,
    port: i32,
    #[serde(default = "default_weight")]
    weight: i32,
}

fn default_weight() -> i32 {
    1
}

pub async fn add_target(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(lb_id): Path<Uuid>,
    Json(body): Json<AddTargetRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Update)?;
    let target = state.lbs.add_target(lb_id, body.instance_id, body.port, body.weight).await?;
    Ok(response::created(target))
}

pub async fn list_targets(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(lb_id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let targets = state.lbs.list_targets(lb_id).await?;
    Ok(response::ok(targets))
}

pub async fn remove_target(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((lb_id, instance_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Update)?;
    state.lbs.remove_target(lb_id, instance_id).await?;
    Ok(response::no_content())
}
