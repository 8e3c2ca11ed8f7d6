use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;

use crate::auth::rbac::Action;
use crate::auth::RequestContext;
use crate::error::ApiResult;
use crate::http::response;
use crate::http::state::AppState;

const RESOURCE: &str = "storage";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub async fn put(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((bucket, key)): Path<(String, String)>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Create)?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    let object = state.storage.put(ctx.user_id, &bucket, &key, content_type, &body).await?;
    Ok(response::created(object))
}

pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((bucket, key)): Path<(String, String)>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let (object, bytes) = state.storage.get(ctx.user_id, &bucket, &key).await?;
    Ok((
        [(header::CONTENT_TYPE, object.content_type.clone())],
        bytes,
    )
        .into_response())
}

pub async fn list(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(bucket): Path<String>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let objects = state.storage.list(ctx.user_id, &bucket).await?;
    Ok(response::ok(objects))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((bucket, key)): Path<(String, String)>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Delete)?;
    state.storage.delete(ctx.user_id, &bucket, &key).await?;
    Ok(response::no_content())
}
