use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::rbac::Action;
use crate::auth::RequestContext;
use crate::error::ApiResult;
use crate::http::response;
use crate::http::state::AppState;

const RESOURCE: &str = "databases";

#[derive(Deserialize)]
pub struct CreateDatabaseRequest {
    name: String,
    engine: String,
    version: String,
    vpc_id: Option<Uuid>,
}

pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<CreateDatabaseRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Create)?;
    let db = state
        .databases
        .create(ctx.user_id, &body.name, &body.engine, &body.version, body.vpc_id)
        .await?;
    Ok(response::created(db))
}

pub async fn list(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let dbs = state.databases.list(ctx.user_id).await?;
    Ok(response::ok(dbs))
}

pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let db = state.databases.get(id).await?;
    Ok(response::ok(db))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Delete)?;
    state.databases.delete(id).await?;
    Ok(response::no_content())
}

pub async fn connection(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let db = state.databases.get(id).await?;
    Ok(response::ok(state.databases.connection_string(&db)))
}

pub async fn logs(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let db = state.databases.get(id).await?;
    let Some(container_id) = db.container_id else {
        return Ok(response::ok(String::new()));
    };
    let logs = state
        .engine
        .fetch_logs(&container_id, 100)
        .await
        .map_err(crate::error::ApiError::internal)?;
    Ok(response::ok(logs))
}
