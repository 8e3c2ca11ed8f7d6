//! Registration, login, and role management — grounded on
//! `internal/core/services/auth.go`. Login always mints a fresh API key
//! (decided in DESIGN.md: the original never rotates or reuses one).

use uuid::Uuid;

use crate::auth::crypto::{hash_password, verify_password};
use crate::db::Repos;
use crate::domain::{ApiKey, Role, User};
use crate::error::{ApiError, ApiResult};
use crate::services::identity::IdentityService;

pub struct AuthService {
    repos: Repos,
    identity: IdentityService,
}

impl AuthService {
    pub fn new(repos: Repos) -> Self {
        let identity = IdentityService::new(repos.clone());
        Self { repos, identity }
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> ApiResult<User> {
        if self.repos.users.get_by_email(email).await?.is_some() {
            return Err(ApiError::InvalidInput("user with this email already exists".into()));
        }

        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash,
            name: name.to_string(),
            role: Role::User.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.repos.users.create(&user).await?;
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<(User, ApiKey)> {
        let user = self
            .repos
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("invalid email or password".into()))?;

        if !verify_password(password, &user.password_hash) {
            return Err(ApiError::Unauthorized("invalid email or password".into()));
        }

        let key = self.identity.create_key(user.id, "Default Key").await?;
        Ok((user, key))
    }

    pub async fn validate_user(&self, user_id: Uuid) -> ApiResult<User> {
        self.repos.users.get_by_id(user_id).await
    }

    pub async fn update_role(&self, user_id: Uuid, role: &str) -> ApiResult<User> {
        let Some(_) = Role::parse(role) else {
            return Err(ApiError::InvalidInput(format!("invalid role '{role}'")));
        };

        let mut user = self.repos.users.get_by_id(user_id).await?;
        user.role = role.to_string();
        user.updated_at = chrono::Utc::now();
        self.repos.users.update(&user).await?;
        Ok(user)
    }

    pub async fn create_bootstrap_key(&self, user_id: Uuid, name: &str) -> ApiResult<ApiKey> {
        self.identity.create_key(user_id, name).await
    }
}
