use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::VpcRepository;
use crate::domain::Vpc;
use crate::error::{ApiError, ApiResult};

#[derive(Default)]
pub struct FakeVpcRepository {
    vpcs: Mutex<HashMap<Uuid, Vpc>>,
    /// Test hook: other fakes register dependents here so `count_dependents`
    /// can be exercised without wiring every repository together.
    pub dependents: Mutex<HashMap<Uuid, i64>>,
}

impl FakeVpcRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VpcRepository for FakeVpcRepository {
    async fn create(&self, vpc: &Vpc) -> ApiResult<()> {
        let mut vpcs = self.vpcs.lock().unwrap();
        if vpcs.values().any(|v| v.user_id == vpc.user_id && v.name == vpc.name) {
            return Err(ApiError::Conflict(format!("vpc '{}' already exists", vpc.name)));
        }
        vpcs.insert(vpc.id, vpc.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<Vpc> {
        self.vpcs
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("vpc".into()))
    }

    async fn get_by_name(&self, user_id: Uuid, name: &str) -> ApiResult<Vpc> {
        self.vpcs
            .lock()
            .unwrap()
            .values()
            .find(|v| v.user_id == user_id && v.name == name)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("vpc".into()))
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Vpc>> {
        Ok(self
            .vpcs
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        if self.vpcs.lock().unwrap().remove(&id).is_none() {
            return Err(ApiError::NotFound("vpc".into()));
        }
        Ok(())
    }

    async fn count_dependents(&self, vpc_id: Uuid) -> ApiResult<i64> {
        Ok(*self.dependents.lock().unwrap().get(&vpc_id).unwrap_or(&0))
    }
}
