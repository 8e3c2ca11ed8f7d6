use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::db::repository::ApiKeyRepository;
use crate::domain::ApiKey;
use crate::error::ApiResult;

#[derive(Default)]
pub struct FakeApiKeyRepository {
    keys: Mutex<HashMap<String, ApiKey>>,
}

impl FakeApiKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for FakeApiKeyRepository {
    async fn create(&self, key: &ApiKey) -> ApiResult<()> {
        self.keys.lock().unwrap().insert(key.key.clone(), key.clone());
        Ok(())
    }

    async fn get_by_key(&self, key: &str) -> ApiResult<Option<ApiKey>> {
        Ok(self.keys.lock().unwrap().get(key).cloned())
    }
}
