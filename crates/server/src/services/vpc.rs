use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::db::Repos;
use crate::domain::{Event, Vpc};
use crate::engine::ContainerEngine;
use crate::error::ApiResult;

pub struct VpcService {
    repos: Repos,
    engine: Arc<dyn ContainerEngine>,
}

impl VpcService {
    pub fn new(repos: Repos, engine: Arc<dyn ContainerEngine>) -> Self {
        Self { repos, engine }
    }

    pub async fn create(&self, user_id: Uuid, name: &str) -> ApiResult<Vpc> {
        let engine_network = format!("thecloud-vpc-{name}");
        let network_id = self
            .engine
            .create_network(&engine_network)
            .await
            .map_err(crate::error::ApiError::internal)?;
        let now = chrono::Utc::now();
        let vpc = Vpc {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            network_id,
            created_at: now,
            updated_at: now,
        };
        self.repos.vpcs.create(&vpc).await?;
        self.append_event("vpc.created", vpc.id, json!({ "name": vpc.name })).await;
        Ok(vpc)
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<Vpc> {
        self.repos.vpcs.get_by_id(id).await
    }

    pub async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Vpc>> {
        self.repos.vpcs.list(user_id).await
    }

    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let vpc = self.repos.vpcs.get_by_id(id).await?;
        let dependents = self.repos.vpcs.count_dependents(id).await?;
        if dependents > 0 {
            return Err(crate::error::ApiError::Conflict(format!(
                "vpc '{}' has {dependents} dependent resource(s)",
                vpc.name
            )));
        }
        let _ = self.engine.remove_network(&vpc.network_id).await;
        self.repos.vpcs.delete(id).await?;
        self.append_event("vpc.deleted", id, json!({ "name": vpc.name })).await;
        Ok(())
    }

    async fn append_event(&self, event_type: &str, resource_id: Uuid, metadata: serde_json::Value) {
        let event = Event::new(event_type, resource_id, "vpc", metadata);
        if let Err(e) = self.repos.events.append(&event).await {
            tracing::warn!(error = %e, event_type, "failed to append event");
        }
    }
}
