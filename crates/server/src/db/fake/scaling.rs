use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::ScalingRepository;
use crate::domain::{ScalingGroup, ScalingGroupStatus, ScalingPolicy};
use crate::error::{ApiError, ApiResult};

#[derive(Default)]
pub struct FakeScalingRepository {
    groups: Mutex<HashMap<Uuid, ScalingGroup>>,
    members: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    policies: Mutex<HashMap<Uuid, ScalingPolicy>>,
    /// Insertion order, used to reproduce the Postgres `ORDER BY created_at`
    /// tie-break for policy listing.
    policy_order: Mutex<Vec<Uuid>>,
}

impl FakeScalingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScalingRepository for FakeScalingRepository {
    async fn create_group(&self, group: &ScalingGroup) -> ApiResult<()> {
        let mut groups = self.groups.lock().unwrap();
        if groups
            .values()
            .any(|g| g.user_id == group.user_id && g.name == group.name)
        {
            return Err(ApiError::Conflict(format!(
                "scaling group '{}' already exists",
                group.name
            )));
        }
        groups.insert(group.id, group.clone());
        Ok(())
    }

    async fn get_group_by_id(&self, id: Uuid) -> ApiResult<ScalingGroup> {
        self.groups
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("scaling group".into()))
    }

    async fn get_group_by_idempotency_key(&self, key: &str) -> ApiResult<Option<ScalingGroup>> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .values()
            .find(|g| g.idempotency_key.as_deref() == Some(key))
            .cloned())
    }

    async fn list_groups(&self, user_id: Uuid) -> ApiResult<Vec<ScalingGroup>> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .values()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_active_groups(&self) -> ApiResult<Vec<ScalingGroup>> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .values()
            .filter(|g| g.status == ScalingGroupStatus::Active)
            .cloned()
            .collect())
    }

    async fn list_deleting_groups(&self) -> ApiResult<Vec<ScalingGroup>> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .values()
            .filter(|g| g.status == ScalingGroupStatus::Deleting)
            .cloned()
            .collect())
    }

    async fn count_groups_by_vpc(&self, vpc_id: Uuid) -> ApiResult<i64> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .values()
            .filter(|g| g.vpc_id == vpc_id && g.status != ScalingGroupStatus::Deleted)
            .count() as i64)
    }

    async fn update_group(&self, group: &mut ScalingGroup) -> ApiResult<()> {
        let mut groups = self.groups.lock().unwrap();
        let current = groups
            .get(&group.id)
            .ok_or_else(|| ApiError::NotFound("scaling group".into()))?;
        if current.version != group.version {
            return Err(ApiError::Conflict("scaling group".into()));
        }
        group.version += 1;
        groups.insert(group.id, group.clone());
        Ok(())
    }

    async fn delete_group(&self, id: Uuid) -> ApiResult<()> {
        if self.groups.lock().unwrap().remove(&id).is_none() {
            return Err(ApiError::NotFound("scaling group".into()));
        }
        self.members.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn add_member(&self, group_id: Uuid, instance_id: Uuid) -> ApiResult<()> {
        self.members
            .lock()
            .unwrap()
            .entry(group_id)
            .or_default()
            .push(instance_id);
        Ok(())
    }

    async fn remove_member(&self, group_id: Uuid, instance_id: Uuid) -> ApiResult<()> {
        if let Some(members) = self.members.lock().unwrap().get_mut(&group_id) {
            members.retain(|m| *m != instance_id);
        }
        Ok(())
    }

    async fn list_members(&self, group_id: Uuid) -> ApiResult<Vec<Uuid>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .get(&group_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_policy(&self, policy: &ScalingPolicy) -> ApiResult<()> {
        self.policies.lock().unwrap().insert(policy.id, policy.clone());
        self.policy_order.lock().unwrap().push(policy.id);
        Ok(())
    }

    async fn get_policy(&self, id: Uuid) -> ApiResult<ScalingPolicy> {
        self.policies
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("scaling policy".into()))
    }

    async fn list_policies(&self, group_id: Uuid) -> ApiResult<Vec<ScalingPolicy>> {
        let policies = self.policies.lock().unwrap();
        Ok(self
            .policy_order
            .lock()
            .unwrap()
            .iter()
            .filter_map(|id| policies.get(id))
            .filter(|p| p.scaling_group_id == group_id)
            .cloned()
            .collect())
    }

    async fn update_policy(&self, policy: &ScalingPolicy) -> ApiResult<()> {
        let mut policies = self.policies.lock().unwrap();
        if !policies.contains_key(&policy.id) {
            return Err(ApiError::NotFound("scaling policy".into()));
        }
        policies.insert(policy.id, policy.clone());
        Ok(())
    }

    async fn delete_policy(&self, id: Uuid) -> ApiResult<()> {
        if self.policies.lock().unwrap().remove(&id).is_none() {
            return Err(ApiError::NotFound("scaling policy".into()));
        }
        self.policy_order.lock().unwrap().retain(|p| *p != id);
        Ok(())
    }
}
