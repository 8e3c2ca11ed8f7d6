use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::LbRepository;
use crate::domain::{LoadBalancer, LbTarget};
use crate::error::{ApiError, ApiResult};

#[derive(Default)]
pub struct FakeLbRepository {
    lbs: Mutex<HashMap<Uuid, LoadBalancer>>,
    targets: Mutex<Vec<LbTarget>>,
}

impl FakeLbRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LbRepository for FakeLbRepository {
    async fn create(&self, lb: &LoadBalancer) -> ApiResult<()> {
        let mut lbs = self.lbs.lock().unwrap();
        if lbs.values().any(|l| l.user_id == lb.user_id && l.name == lb.name) {
            return Err(ApiError::Conflict(format!("load balancer '{}' already exists", lb.name)));
        }
        lbs.insert(lb.id, lb.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<LoadBalancer> {
        self.lbs
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::LbNotFound(id.to_string()))
    }

    async fn get_by_idempotency_key(&self, key: &str) -> ApiResult<Option<LoadBalancer>> {
        Ok(self
            .lbs
            .lock()
            .unwrap()
            .values()
            .find(|l| l.idempotency_key.as_deref() == Some(key))
            .cloned())
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<LoadBalancer>> {
        Ok(self
            .lbs
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> ApiResult<Vec<LoadBalancer>> {
        Ok(self.lbs.lock().unwrap().values().cloned().collect())
    }

    async fn update(&self, lb: &mut LoadBalancer) -> ApiResult<()> {
        let mut lbs = self.lbs.lock().unwrap();
        let current = lbs
            .get(&lb.id)
            .ok_or_else(|| ApiError::LbNotFound(lb.id.to_string()))?;
        if current.version != lb.version {
            return Err(ApiError::Conflict("load balancer".into()));
        }
        lb.version += 1;
        lbs.insert(lb.id, lb.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        if self.lbs.lock().unwrap().remove(&id).is_none() {
            return Err(ApiError::LbNotFound(id.to_string()));
        }
        self.targets.lock().unwrap().retain(|t| t.lb_id != id);
        Ok(())
    }

    async fn add_target(&self, target: &LbTarget) -> ApiResult<()> {
        self.targets.lock().unwrap().push(target.clone());
        Ok(())
    }

    async fn remove_target(&self, lb_id: Uuid, instance_id: Uuid) -> ApiResult<()> {
        let mut targets = self.targets.lock().unwrap();
        let before = targets.len();
        targets.retain(|t| !(t.lb_id == lb_id && t.instance_id == instance_id));
        if targets.len() == before {
            return Err(ApiError::NotFound("target".into()));
        }
        Ok(())
    }

    async fn list_targets(&self, lb_id: Uuid) -> ApiResult<Vec<LbTarget>> {
        Ok(self
            .targets
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.lb_id == lb_id)
            .cloned()
            .collect())
    }

    async fn target_exists(&self, lb_id: Uuid, instance_id: Uuid) -> ApiResult<bool> {
        Ok(self
            .targets
            .lock()
            .unwrap()
            .iter()
            .any(|t| t.lb_id == lb_id && t.instance_id == instance_id))
    }
}
