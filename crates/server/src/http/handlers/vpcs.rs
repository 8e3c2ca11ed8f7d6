use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::rbac::Action;
use crate::auth::RequestContext;
use crate::error::ApiResult;
use crate::http::response;
use crate::http::state::AppState;

const RESOURCE: &str = "vpcs";

#[derive(Deserialize)]
pub struct CreateVpcRequest {
    name: String,
}

pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<CreateVpcRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Create)?;
    let vpc = state.vpcs.create(ctx.user_id, &body.name).await?;
    Ok(response::created(vpc))
}

pub async fn list(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let vpcs = state.vpcs.list(ctx.user_id).await?;
    Ok(response::ok(vpcs))
}

pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let vpc = state.vpcs.get(id).await?;
    Ok(response::ok(vpc))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Delete)?;
    state.vpcs.delete(id).await?;
    Ok(response::no_content())
}
