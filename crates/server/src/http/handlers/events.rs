use axum::extract::{Query, State};
use serde::Deserialize;

use crate::auth::rbac::Action;
use crate::auth::RequestContext;
use crate::error::ApiResult;
use crate::http::response;
use crate::http::state::AppState;

const RESOURCE: &str = "events";

#[derive(Deserialize)]
pub struct ListQuery {
    limit: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<ListQuery>,
) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let events = state.events.list_recent(query.limit).await?;
    Ok(response::ok(events))
}
