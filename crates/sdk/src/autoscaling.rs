//! Mirrors `pkg/sdk/autoscaling_test.go`'s expected `Client` surface.

use serde::Serialize;
use uuid::Uuid;

use crate::client::{Client, SdkResult};
use crate::models::{ScalingGroup, ScalingPolicy};

#[derive(Debug, Clone, Serialize)]
pub struct CreateScalingGroupRequest {
    pub name: String,
    pub vpc_id: Uuid,
    pub image: String,
    #[serde(default)]
    pub ports: String,
    pub min_instances: i32,
    pub max_instances: i32,
    pub desired_count: i32,
    pub load_balancer_id: Option<Uuid>,
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePolicyRequest {
    pub scaling_group_id: Uuid,
    pub name: String,
    pub metric_type: String,
    pub target_value: f64,
    pub scale_out_step: i32,
    pub scale_in_step: i32,
    pub cooldown_sec: i32,
}

impl Client {
    pub async fn create_scaling_group(&self, req: &CreateScalingGroupRequest) -> SdkResult<ScalingGroup> {
        self.post("/autoscaling/groups", req).await
    }

    pub async fn list_scaling_groups(&self) -> SdkResult<Vec<ScalingGroup>> {
        self.get("/autoscaling/groups").await
    }

    pub async fn get_scaling_group(&self, id: Uuid) -> SdkResult<ScalingGroup> {
        self.get(&format!("/autoscaling/groups/{id}")).await
    }

    pub async fn delete_scaling_group(&self, id: Uuid) -> SdkResult<()> {
        self.delete(&format!("/autoscaling/groups/{id}")).await
    }

    pub async fn create_scaling_policy(&self, req: &CreatePolicyRequest) -> SdkResult<ScalingPolicy> {
        self.post("/autoscaling/policies", req).await
    }

    pub async fn list_scaling_policies(&self, group_id: Uuid) -> SdkResult<Vec<ScalingPolicy>> {
        self.get(&format!("/autoscaling/groups/{group_id}/policies")).await
    }
}
