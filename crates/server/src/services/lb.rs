use uuid::Uuid;

use crate::db::Repos;
use crate::domain::{Algorithm, Event, LbStatus, LbTarget, LoadBalancer, TargetHealth};
use crate::error::ApiError::{self, InvalidInput, LbCrossVpc, LbNotFound, LbTargetExists};
use crate::error::ApiResult;

pub struct LbService {
    repos: Repos,
}

impl LbService {
    pub fn new(repos: Repos) -> Self {
        Self { repos }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        vpc_id: Uuid,
        port: i32,
        algorithm: &str,
        idempotency_key: Option<String>,
    ) -> ApiResult<LoadBalancer> {
        if let Some(key) = &idempotency_key {
            if let Some(existing) = self.repos.lbs.get_by_idempotency_key(key).await? {
                return Ok(existing);
            }
        }

        let algorithm = Algorithm::parse(algorithm)
            .ok_or_else(|| InvalidInput(format!("unknown algorithm '{algorithm}'")))?;
        if !(1..=65535).contains(&port) {
            return Err(InvalidInput(format!("port {port} out of range")));
        }
        // Existence check — NotFound propagates as-is.
        self.repos.vpcs.get_by_id(vpc_id).await?;

        let now = chrono::Utc::now();
        let lb = LoadBalancer {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            vpc_id,
            port,
            algorithm,
            status: LbStatus::Creating,
            idempotency_key,
            container_id: None,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.repos.lbs.create(&lb).await?;
        self.append_event("lb.created", lb.id, serde_json::json!({ "name": lb.name })).await;
        Ok(lb)
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<LoadBalancer> {
        self.repos.lbs.get_by_id(id).await
    }

    pub async fn list(&self, user_id: Uuid) -> ApiResult<Vec<LoadBalancer>> {
        self.repos.lbs.list(user_id).await
    }

    /// Soft-delete: the worker performs physical cleanup next tick.
    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let mut lb = self.repos.lbs.get_by_id(id).await?;
        lb.status = LbStatus::Deleted;
        self.repos.lbs.update(&mut lb).await?;
        Ok(())
    }

    pub async fn add_target(
        &self,
        lb_id: Uuid,
        instance_id: Uuid,
        port: i32,
        weight: i32,
    ) -> ApiResult<LbTarget> {
        let lb = self.repos.lbs.get_by_id(lb_id).await.map_err(|e| match e {
            ApiError::NotFound(m) => LbNotFound(m),
            other => other,
        })?;
        let instance = self.repos.instances.get_by_id(instance_id).await?;

        if instance.vpc_id != Some(lb.vpc_id) {
            return Err(LbCrossVpc);
        }
        if self.repos.lbs.target_exists(lb_id, instance_id).await? {
            return Err(LbTargetExists(format!("{lb_id}/{instance_id}")));
        }
        if weight < 1 {
            return Err(InvalidInput("weight must be >= 1".into()));
        }

        let target = LbTarget {
            lb_id,
            instance_id,
            port,
            weight,
            health: TargetHealth::Unknown,
        };
        self.repos.lbs.add_target(&target).await?;
        Ok(target)
    }

    pub async fn remove_target(&self, lb_id: Uuid, instance_id: Uuid) -> ApiResult<()> {
        self.repos.lbs.remove_target(lb_id, instance_id).await
    }

    pub async fn list_targets(&self, lb_id: Uuid) -> ApiResult<Vec<LbTarget>> {
        self.repos.lbs.list_targets(lb_id).await
    }

    async fn append_event(&self, event_type: &str, resource_id: Uuid, metadata: serde_json::Value) {
        let event = Event::new(event_type, resource_id, "load_balancer", metadata);
        if let Err(e) = self.repos.events.append(&event).await {
            tracing::warn!(error = %e, event_type, "failed to append event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fake::test_repos;
    use crate::domain::{Instance, InstanceStatus, Vpc};

    async fn seed_vpc(repos: &Repos, user_id: Uuid, name: &str) -> Uuid {
        let vpc = Vpc {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            network_id: format!("net-{name}"),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        repos.vpcs.create(&vpc).await.unwrap();
        vpc.id
    }

    async fn seed_instance(repos: &Repos, user_id: Uuid, vpc_id: Uuid) -> Uuid {
        let now = chrono::Utc::now();
        let instance = Instance {
            id: Uuid::new_v4(),
            user_id,
            name: "web-1".into(),
            image: "nginx".into(),
            status: InstanceStatus::Running,
            ports: String::new(),
            container_id: Some("fake-container-1".into()),
            vpc_id: Some(vpc_id),
            version: 1,
            created_at: now,
            updated_at: now,
        };
        repos.instances.create(&instance).await.unwrap();
        instance.id
    }

    #[tokio::test]
    async fn rejects_target_in_different_vpc() {
        let repos = test_repos();
        let user_id = Uuid::new_v4();
        let lb_vpc = seed_vpc(&repos, user_id, "vpc-lb").await;
        let other_vpc = seed_vpc(&repos, user_id, "vpc-other").await;
        let instance_id = seed_instance(&repos, user_id, other_vpc).await;

        let service = LbService::new(repos);
        let lb = service
            .create(user_id, "lb1", lb_vpc, 80, "round-robin", None)
            .await
            .unwrap();

        let err = service.add_target(lb.id, instance_id, 8080, 1).await.unwrap_err();
        assert!(matches!(err, ApiError::LbCrossVpc));
    }

    #[tokio::test]
    async fn create_is_idempotent_on_key() {
        let repos = test_repos();
        let user_id = Uuid::new_v4();
        let vpc_id = seed_vpc(&repos, user_id, "vpc-a").await;
        let service = LbService::new(repos);

        let key = Some("req-abc".to_string());
        let first = service
            .create(user_id, "lb1", vpc_id, 80, "round-robin", key.clone())
            .await
            .unwrap();
        let second = service
            .create(user_id, "lb1-retry", vpc_id, 443, "least-conn", key)
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn rejects_duplicate_target_registration() {
        let repos = test_repos();
        let user_id = Uuid::new_v4();
        let vpc_id = seed_vpc(&repos, user_id, "vpc-a").await;
        let instance_id = seed_instance(&repos, user_id, vpc_id).await;
        let service = LbService::new(repos);

        let lb = service
            .create(user_id, "lb1", vpc_id, 80, "round-robin", None)
            .await
            .unwrap();
        service.add_target(lb.id, instance_id, 8080, 1).await.unwrap();

        let err = service.add_target(lb.id, instance_id, 8080, 1).await.unwrap_err();
        assert!(matches!(err, ApiError::LbTargetExists(_)));
    }
}
