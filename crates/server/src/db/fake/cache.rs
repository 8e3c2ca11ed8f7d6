use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::CacheRepository;
use crate::domain::Cache;
use crate::error::{ApiError, ApiResult};

#[derive(Default)]
pub struct FakeCacheRepository {
    rows: Mutex<HashMap<Uuid, Cache>>,
}

impl FakeCacheRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheRepository for FakeCacheRepository {
    async fn create(&self, cache: &Cache) -> ApiResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|r| r.user_id == cache.user_id && r.name == cache.name) {
            return Err(ApiError::Conflict(format!("cache '{}' already exists", cache.name)));
        }
        rows.insert(cache.id, cache.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<Cache> {
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("cache".into()))
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Cache>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, cache: &Cache) -> ApiResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&cache.id) {
            return Err(ApiError::NotFound("cache".into()));
        }
        rows.insert(cache.id, cache.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        if self.rows.lock().unwrap().remove(&id).is_none() {
            return Err(ApiError::NotFound("cache".into()));
        }
        Ok(())
    }
}
