use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::rbac::Action;
use crate::auth::RequestContext;
use crate::error::ApiResult;
use crate::http::response;
use crate::http::state::AppState;

const RESOURCE: &str = "secrets";

#[derive(Deserialize)]
pub struct CreateSecretRequest {
    name: String,
    value: String,
    description: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<CreateSecretRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Create)?;
    let secret = state
        .secrets
        .create(ctx.user_id, &body.name, &body.value, body.description)
        .await?;
    Ok(response::created(secret))
}

pub async fn list(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let secrets = state.secrets.list(ctx.user_id).await?;
    Ok(response::ok(secrets))
}

pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let secret = state.secrets.get(id).await?;
    Ok(response::ok(secret))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Delete)?;
    state.secrets.delete(id).await?;
    Ok(response::no_content())
}

/// Not in spec.md's route table as a named path — gated behind the same
/// `secrets:read` permission as `Get`, but only this route ever returns
/// plaintext.
pub async fn reveal(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let value = state.secrets.reveal(id).await?;
    Ok(response::ok(value))
}
