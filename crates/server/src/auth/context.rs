use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use uuid::Uuid;

use crate::db::Repos;
use crate::domain::Role;
use crate::error::ApiError;

/// Identity attached to a request after `X-API-Key` is resolved, mirroring
/// the role threaded through `gin.Context` in the original `roleFromContext`.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl RequestContext {
    pub fn require(&self, resource: &str, action: super::rbac::Action) -> Result<(), ApiError> {
        if super::rbac::has_permission(self.role, resource, action) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "role '{}' cannot {:?} {}",
                self.role.as_str(),
                action,
                resource
            )))
        }
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    Repos: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repos = Repos::from_ref(state);
        let key = parts
            .headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing X-API-Key header".into()))?;

        let api_key = repos
            .api_keys
            .get_by_key(key)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("invalid API key".into()))?;

        let user = repos.users.get_by_id(api_key.user_id).await.map_err(|e| {
            if matches!(e, ApiError::NotFound(_)) {
                ApiError::Unauthorized("invalid API key".into())
            } else {
                e
            }
        })?;

        let role = Role::parse(&user.role)
            .ok_or_else(|| ApiError::internal(InvalidRoleError(user.role.clone())))?;

        Ok(RequestContext {
            user_id: user.id,
            role,
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("stored role '{0}' is not a recognized role")]
struct InvalidRoleError(String);
