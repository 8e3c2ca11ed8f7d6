use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::rbac::Action;
use crate::auth::RequestContext;
use crate::domain::Role;
use crate::error::ApiResult;
use crate::http::response;
use crate::http::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    email: String,
    password: String,
    name: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<axum::response::Response> {
    let user = state.auth.register(&body.email, &body.password, &body.name).await?;
    Ok(response::created(user))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    user: crate::domain::User,
    api_key: crate::domain::ApiKey,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<axum::response::Response> {
    let (user, api_key) = state.auth.login(&body.email, &body.password).await?;
    Ok(response::ok(LoginResponse { user, api_key }))
}

#[derive(Deserialize)]
pub struct CreateKeyRequest {
    user_id: Uuid,
    name: String,
}

pub async fn create_key(
    State(state): State<AppState>,
    Json(body): Json<CreateKeyRequest>,
) -> ApiResult<axum::response::Response> {
    let key = state.auth.create_bootstrap_key(body.user_id, &body.name).await?;
    Ok(response::created(key))
}

pub async fn list_roles(ctx: RequestContext) -> ApiResult<axum::response::Response> {
    ctx.require("auth", Action::Read)?;
    let roles = [Role::Owner, Role::Admin, Role::Developer, Role::Viewer]
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>();
    Ok(response::ok(roles))
}

pub async fn my_role(ctx: RequestContext) -> ApiResult<axum::response::Response> {
    Ok(response::ok(ctx.role.as_str()))
}

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    role: String,
}

pub async fn update_user_role(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateRoleRequest>,
) -> ApiResult<axum::response::Response> {
    ctx.require("auth", Action::Update)?;
    let user = state.auth.update_role(user_id, &body.role).await?;
    Ok(response::ok(user))
}
