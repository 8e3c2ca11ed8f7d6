use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::rbac::Action;
use crate::auth::RequestContext;
use crate::error::ApiResult;
use crate::http::response;
use crate::http::state::AppState;

const RESOURCE: &str = "autoscaling";

#[derive(Deserialize)]
pub struct CreateGroupRequest {
    name: String,
    vpc_id: Uuid,
    image: String,
    #[serde(default)]
    ports: String,
    min_instances: i32,
    max_instances: i32,
    desired_count: i32,
    load_balancer_id: Option<Uuid>,
    idempotency_key: Option<String>,
}

pub async fn create_group(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<CreateGroupRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Create)?;
    let group = state
        .scaling
        .create_group(
            ctx.user_id,
            &body.name,
            body.vpc_id,
            &body.image,
            &body.ports,
            body.min_instances,
            body.max_instances,
            body.desired_count,
            body.load_balancer_id,
            body.idempotency_key,
        )
        .await?;
    Ok(response::created(group))
}

pub async fn list_groups(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let groups = state.scaling.list_groups(ctx.user_id).await?;
    Ok(response::ok(groups))
}

pub async fn get_group(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let group = state.scaling.get_group(id).await?;
    Ok(response::ok(group))
}

pub async fn delete_group(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Delete)?;
    state.scaling.delete_group(id).await?;
    Ok(response::no_content())
}

#[derive(Deserialize)]
pub struct SetDesiredRequest {
    desired_count: i32,
}

pub async fn set_desired_capacity(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(body): Json<SetDesiredRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Update)?;
    let group = state.scaling.set_desired_capacity(id, body.desired_count).await?;
    Ok(response::ok(group))
}

#[derive(Deserialize)]
pub struct CreatePolicyRequest {
    scaling_group_id: Uuid,
    name: String,
    #[serde(default = "default_metric_type")]
    metric_type: String,
    target_value: f64,
    scale_out_step: i32,
    scale_in_step: i32,
    cooldown_sec: i32,
}

fn default_metric_type() -> String {
    "cpu".to_string()
}

pub async fn create_policy(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<CreatePolicyRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Create)?;
    let policy = state
        .scaling
        .create_policy(
            body.scaling_group_id,
            &body.name,
            &body.metric_type,
            body.target_value,
            body.scale_out_step,
            body.scale_in_step,
            body.cooldown_sec,
        )
        .await?;
    Ok(response::created(policy))
}

pub async fn list_policies(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(group_id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let policies = state.scaling.list_policies(group_id).await?;
    Ok(response::ok(policies))
}

pub async fn delete_policy(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Delete)?;
    state.scaling.delete_policy(id).await?;
    Ok(response::no_content())
}
