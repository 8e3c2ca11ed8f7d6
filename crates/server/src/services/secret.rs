//! Secret-at-rest encryption, grounded on `internal/core/domain/secret.go`
//! (which stores secrets in plaintext) enriched with real AES-256-GCM
//! encryption via [`crate::auth::SecretCipher`].

use uuid::Uuid;

use crate::auth::SecretCipher;
use crate::db::Repos;
use crate::domain::Secret;
use crate::error::{ApiError, ApiResult};

pub struct SecretService {
    repos: Repos,
    cipher: SecretCipher,
}

impl SecretService {
    pub fn new(repos: Repos, cipher: SecretCipher) -> Self {
        Self { repos, cipher }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        value: &str,
        description: Option<String>,
    ) -> ApiResult<Secret> {
        if self.repos.secrets.get_by_name(user_id, name).await?.is_some() {
            return Err(ApiError::Conflict(format!("secret '{name}' already exists")));
        }

        let encrypted_value = self.cipher.encrypt(value)?;
        let now = chrono::Utc::now();
        let secret = Secret {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            encrypted_value,
            description,
            last_accessed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.repos.secrets.create(&secret).await?;
        Ok(secret)
    }

    /// Metadata only — never decrypts the value.
    pub async fn get(&self, id: Uuid) -> ApiResult<Secret> {
        self.repos.secrets.get_by_id(id).await
    }

    pub async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Secret>> {
        self.repos.secrets.list(user_id).await
    }

    /// Decrypts and returns the plaintext value, gated by the caller already
    /// having passed the `secrets:read` RBAC check at the handler.
    pub async fn reveal(&self, id: Uuid) -> ApiResult<String> {
        let secret = self.repos.secrets.get_by_id(id).await?;
        let plaintext = self.cipher.decrypt(&secret.encrypted_value)?;
        self.repos.secrets.touch_accessed(id).await?;
        Ok(plaintext)
    }

    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        self.repos.secrets.delete(id).await
    }
}
