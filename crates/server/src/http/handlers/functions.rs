use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::rbac::Action;
use crate::auth::RequestContext;
use crate::error::ApiResult;
use crate::http::response;
use crate::http::state::AppState;

const RESOURCE: &str = "functions";

#[derive(Deserialize)]
pub struct CreateFunctionRequest {
    name: String,
    runtime: String,
    handler: String,
    code_path: String,
    #[serde(default = "default_timeout")]
    timeout_sec: i32,
    #[serde(default = "default_memory")]
    memory_mb: i32,
}

fn default_timeout() -> i32 {
    30
}

fn default_memory() -> i32 {
    128
}

pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<CreateFunctionRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Create)?;
    let function = state
        .functions
        .create(
            ctx.user_id,
            &body.name,
            &body.runtime,
            &body.handler,
            &body.code_path,
            body.timeout_sec,
            body.memory_mb,
        )
        .await?;
    Ok(response::created(function))
}

pub async fn list(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let functions = state.functions.list(ctx.user_id).await?;
    Ok(response::ok(functions))
}

pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let function = state.functions.get(id).await?;
    Ok(response::ok(function))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Delete)?;
    state.functions.delete(id).await?;
    Ok(response::no_content())
}

#[derive(Deserialize, Default)]
pub struct InvokeRequest {
    #[serde(default)]
    payload: String,
}

pub async fn invoke(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(body): Json<InvokeRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Execute)?;
    let invocation = state.functions.invoke(id, &body.payload).await?;
    Ok(response::ok(invocation))
}

pub async fn logs(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let invocations = state.functions.logs(id).await?;
    Ok(response::ok(invocations))
}
