//! Mirrors `pkg/sdk/rbac.go` plus the registration/login/bootstrap-key
//! endpoints `cmd/cloud-cli/auth.go` drives directly.

use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::client::{Client, SdkResult};
use crate::models::{ApiKey, LoginResponse, User};

#[derive(Debug, Clone, Serialize)]
pub struct RoleResponse {
    pub role: String,
}

impl Client {
    pub async fn register(&self, email: &str, password: &str, name: &str) -> SdkResult<User> {
        self.post(
            "/auth/register",
            &json!({ "email": email, "password": password, "name": name }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> SdkResult<LoginResponse> {
        self.post("/auth/login", &json!({ "email": email, "password": password }))
            .await
    }

    /// Mints a bootstrap API key for `user_id`, no existing key required —
    /// mirrors `cloud auth create-demo`'s call with an empty-key client.
    pub async fn create_key(&self, user_id: Uuid, name: &str) -> SdkResult<ApiKey> {
        self.post("/auth/keys", &json!({ "user_id": user_id, "name": name }))
            .await
    }

    pub async fn list_roles(&self) -> SdkResult<Vec<String>> {
        self.get("/auth/roles").await
    }

    pub async fn my_role(&self) -> SdkResult<String> {
        self.get("/auth/me/role").await
    }

    pub async fn update_user_role(&self, user_id: Uuid, role: &str) -> SdkResult<User> {
        self.put(&format!("/auth/users/{user_id}/role"), &json!({ "role": role }))
            .await
    }
}
