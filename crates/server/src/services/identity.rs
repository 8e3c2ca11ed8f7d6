//! API key minting — a narrow service so `AuthService::login` and the public
//! `/auth/keys` bootstrap route share one code path, grounded on
//! `internal/core/ports.IdentityService` (`CreateKey`).

use uuid::Uuid;

use crate::auth::crypto::generate_api_key;
use crate::db::Repos;
use crate::domain::ApiKey;
use crate::error::ApiResult;

pub struct IdentityService {
    repos: Repos,
}

impl IdentityService {
    pub fn new(repos: Repos) -> Self {
        Self { repos }
    }

    pub async fn create_key(&self, user_id: Uuid, name: &str) -> ApiResult<ApiKey> {
        let key = ApiKey {
            key: generate_api_key(),
            user_id,
            name: name.to_string(),
            created_at: chrono::Utc::now(),
        };
        self.repos.api_keys.create(&key).await?;
        Ok(key)
    }
}
