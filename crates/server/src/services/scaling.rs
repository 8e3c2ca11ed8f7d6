//! Auto-scaling group and policy CRUD. Reconciliation itself lives in
//! `workers::autoscaling_worker`; this service only validates and persists,
//! grounded on `internal/core/services/autoscaling.go`.

use uuid::Uuid;

use crate::config::ThecloudConfig;
use crate::db::Repos;
use crate::domain::{ScalingGroup, ScalingGroupStatus, ScalingPolicy};
use crate::error::{ApiError, ApiResult};

pub struct ScalingService {
    repos: Repos,
    max_instances_hard_limit: i32,
    max_groups_per_vpc: i32,
    min_cooldown_seconds: i32,
}

impl ScalingService {
    pub fn new(repos: Repos, config: &ThecloudConfig) -> Self {
        Self {
            repos,
            max_instances_hard_limit: config.max_instances_hard_limit as i32,
            max_groups_per_vpc: config.max_scaling_groups_per_vpc as i32,
            min_cooldown_seconds: config.min_cooldown_seconds as i32,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_group(
        &self,
        user_id: Uuid,
        name: &str,
        vpc_id: Uuid,
        image: &str,
        ports: &str,
        min_instances: i32,
        max_instances: i32,
        desired_count: i32,
        load_balancer_id: Option<Uuid>,
        idempotency_key: Option<String>,
    ) -> ApiResult<ScalingGroup> {
        if let Some(key) = &idempotency_key {
            if let Some(existing) = self.repos.scaling.get_group_by_idempotency_key(key).await? {
                return Ok(existing);
            }
        }

        if max_instances > self.max_instances_hard_limit {
            return Err(ApiError::InvalidInput(format!(
                "max_instances cannot exceed {}",
                self.max_instances_hard_limit
            )));
        }
        if min_instances < 0 {
            return Err(ApiError::InvalidInput("min_instances cannot be negative".into()));
        }
        if min_instances > max_instances {
            return Err(ApiError::InvalidInput(
                "min_instances cannot be greater than max_instances".into(),
            ));
        }
        if desired_count < min_instances || desired_count > max_instances {
            return Err(ApiError::InvalidInput(
                "desired_count must be between min and max instances".into(),
            ));
        }

        self.repos.vpcs.get_by_id(vpc_id).await?;

        let count = self.repos.scaling.count_groups_by_vpc(vpc_id).await?;
        if count >= i64::from(self.max_groups_per_vpc) {
            return Err(ApiError::ResourceLimitExceeded(format!(
                "vpc already has {count} scaling group(s) (max: {})",
                self.max_groups_per_vpc
            )));
        }

        let now = chrono::Utc::now();
        let group = ScalingGroup {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            vpc_id,
            load_balancer_id,
            image: image.to_string(),
            ports: ports.to_string(),
            min_instances,
            max_instances,
            desired_count,
            current_count: 0,
            status: ScalingGroupStatus::Active,
            idempotency_key,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.repos.scaling.create_group(&group).await?;
        Ok(group)
    }

    pub async fn get_group(&self, id: Uuid) -> ApiResult<ScalingGroup> {
        self.repos.scaling.get_group_by_id(id).await
    }

    pub async fn list_groups(&self, user_id: Uuid) -> ApiResult<Vec<ScalingGroup>> {
        self.repos.scaling.list_groups(user_id).await
    }

    /// Marks the group `DELETING`; the worker terminates members, deregisters
    /// LB targets, then hard-deletes the row.
    pub async fn delete_group(&self, id: Uuid) -> ApiResult<()> {
        let mut group = self.repos.scaling.get_group_by_id(id).await?;
        group.status = ScalingGroupStatus::Deleting;
        self.repos.scaling.update_group(&mut group).await?;
        Ok(())
    }

    pub async fn set_desired_capacity(&self, id: Uuid, desired: i32) -> ApiResult<ScalingGroup> {
        let mut group = self.repos.scaling.get_group_by_id(id).await?;
        if desired < group.min_instances || desired > group.max_instances {
            return Err(ApiError::InvalidInput(format!(
                "desired must be between {} and {}",
                group.min_instances, group.max_instances
            )));
        }
        group.desired_count = desired;
        self.repos.scaling.update_group(&mut group).await?;
        Ok(group)
    }

    pub async fn create_policy(
        &self,
        group_id: Uuid,
        name: &str,
        metric_type: &str,
        target_value: f64,
        scale_out_step: i32,
        scale_in_step: i32,
        cooldown_sec: i32,
    ) -> ApiResult<ScalingPolicy> {
        self.repos.scaling.get_group_by_id(group_id).await?;

        if cooldown_sec < self.min_cooldown_seconds {
            return Err(ApiError::InvalidInput(format!(
                "cooldown must be at least {} seconds",
                self.min_cooldown_seconds
            )));
        }
        if scale_out_step < 1 || scale_in_step < 1 {
            return Err(ApiError::InvalidInput("scale steps must be >= 1".into()));
        }

        let policy = ScalingPolicy {
            id: Uuid::new_v4(),
            scaling_group_id: group_id,
            name: name.to_string(),
            metric_type: metric_type.to_string(),
            target_value,
            scale_out_step,
            scale_in_step,
            cooldown_sec,
            last_scaled_at: None,
            created_at: chrono::Utc::now(),
        };
        self.repos.scaling.create_policy(&policy).await?;
        Ok(policy)
    }

    pub async fn list_policies(&self, group_id: Uuid) -> ApiResult<Vec<ScalingPolicy>> {
        self.repos.scaling.list_policies(group_id).await
    }

    pub async fn delete_policy(&self, id: Uuid) -> ApiResult<()> {
        self.repos.scaling.delete_policy(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use crate::db::fake::test_repos;
    use crate::domain::Vpc;

    fn test_config() -> ThecloudConfig {
        ThecloudConfig {
            database_url: String::new(),
            port: 8080,
            environment: Environment::Development,
            encryption_secret: "test".into(),
            max_instances_hard_limit: 100,
            max_scaling_groups_per_vpc: 2,
            min_cooldown_seconds: 60,
            docker_socket: String::new(),
            storage_root: "./data".into(),
        }
    }

    async fn seed_vpc(repos: &Repos, user_id: Uuid) -> Uuid {
        let vpc = Vpc {
            id: Uuid::new_v4(),
            user_id,
            name: "vpc-a".into(),
            network_id: "net-a".into(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        repos.vpcs.create(&vpc).await.unwrap();
        vpc.id
    }

    #[tokio::test]
    async fn rejects_desired_count_outside_bounds() {
        let repos = test_repos();
        let user_id = Uuid::new_v4();
        let vpc_id = seed_vpc(&repos, user_id).await;
        let service = ScalingService::new(repos, &test_config());

        let err = service
            .create_group(user_id, "web", vpc_id, "nginx", "", 2, 5, 10, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn rejects_min_greater_than_max() {
        let repos = test_repos();
        let user_id = Uuid::new_v4();
        let vpc_id = seed_vpc(&repos, user_id).await;
        let service = ScalingService::new(repos, &test_config());

        let err = service
            .create_group(user_id, "web", vpc_id, "nginx", "", 5, 2, 3, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn enforces_max_groups_per_vpc() {
        let repos = test_repos();
        let user_id = Uuid::new_v4();
        let vpc_id = seed_vpc(&repos, user_id).await;
        let service = ScalingService::new(repos, &test_config());

        service
            .create_group(user_id, "a", vpc_id, "nginx", "", 0, 2, 1, None, None)
            .await
            .unwrap();
        service
            .create_group(user_id, "b", vpc_id, "nginx", "", 0, 2, 1, None, None)
            .await
            .unwrap();

        let err = service
            .create_group(user_id, "c", vpc_id, "nginx", "", 0, 2, 1, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ResourceLimitExceeded(_)));
    }

    #[tokio::test]
    async fn create_group_is_idempotent_on_key() {
        let repos = test_repos();
        let user_id = Uuid::new_v4();
        let vpc_id = seed_vpc(&repos, user_id).await;
        let service = ScalingService::new(repos, &test_config());

        let key = Some("req-123".to_string());
        let first = service
            .create_group(user_id, "a", vpc_id, "nginx", "", 0, 2, 1, None, key.clone())
            .await
            .unwrap();
        let second = service
            .create_group(user_id, "a-retry", vpc_id, "nginx", "", 0, 2, 1, None, key)
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn rejects_cooldown_below_minimum() {
        let repos = test_repos();
        let user_id = Uuid::new_v4();
        let vpc_id = seed_vpc(&repos, user_id).await;
        let service = ScalingService::new(repos, &test_config());

        let group = service
            .create_group(user_id, "a", vpc_id, "nginx", "", 0, 2, 1, None, None)
            .await
            .unwrap();

        let err = service
            .create_policy(group.id, "cpu-scale", "cpu", 50.0, 1, 1, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
}
