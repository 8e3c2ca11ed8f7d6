use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::StorageRepository;
use crate::domain::StorageObject;
use crate::error::{ApiError, ApiResult};

#[derive(Default)]
pub struct FakeStorageRepository {
    objects: Mutex<HashMap<(Uuid, String, String), StorageObject>>,
}

impl FakeStorageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageRepository for FakeStorageRepository {
    async fn put(&self, object: &StorageObject) -> ApiResult<()> {
        self.objects.lock().unwrap().insert(
            (object.user_id, object.bucket.clone(), object.key.clone()),
            object.clone(),
        );
        Ok(())
    }

    async fn get(&self, user_id: Uuid, bucket: &str, key: &str) -> ApiResult<StorageObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(user_id, bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| ApiError::NotFound("object".into()))
    }

    async fn list(&self, user_id: Uuid, bucket: &str) -> ApiResult<Vec<StorageObject>> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.user_id == user_id && o.bucket == bucket)
            .cloned()
            .collect())
    }

    async fn delete(&self, user_id: Uuid, bucket: &str, key: &str) -> ApiResult<()> {
        if self
            .objects
            .lock()
            .unwrap()
            .remove(&(user_id, bucket.to_string(), key.to_string()))
            .is_none()
        {
            return Err(ApiError::NotFound("object".into()));
        }
        Ok(())
    }
}
