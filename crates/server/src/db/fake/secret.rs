use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::SecretRepository;
use crate::domain::Secret;
use crate::error::{ApiError, ApiResult};

#[derive(Default)]
pub struct FakeSecretRepository {
    rows: Mutex<HashMap<Uuid, Secret>>,
}

impl FakeSecretRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretRepository for FakeSecretRepository {
    async fn create(&self, secret: &Secret) -> ApiResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .values()
            .any(|r| r.user_id == secret.user_id && r.name == secret.name)
        {
            return Err(ApiError::Conflict(format!("secret '{}' already exists", secret.name)));
        }
        rows.insert(secret.id, secret.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<Secret> {
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("secret".into()))
    }

    async fn get_by_name(&self, user_id: Uuid, name: &str) -> ApiResult<Option<Secret>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|r| r.user_id == user_id && r.name == name)
            .cloned())
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Secret>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn touch_accessed(&self, id: Uuid) -> ApiResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let secret = rows.get_mut(&id).ok_or_else(|| ApiError::NotFound("secret".into()))?;
        secret.last_accessed_at = Some(chrono::Utc::now());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        if self.rows.lock().unwrap().remove(&id).is_none() {
            return Err(ApiError::NotFound("secret".into()));
        }
        Ok(())
    }
}
