//! Mirrors `pkg/sdk/compute.go`'s instance lifecycle calls.

use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::client::{Client, SdkResult};
use crate::models::Instance;

#[derive(Debug, Clone, Default, Serialize)]
pub struct LaunchInstanceRequest {
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub ports: String,
    pub vpc_id: Option<Uuid>,
}

impl Client {
    pub async fn list_instances(&self) -> SdkResult<Vec<Instance>> {
        self.get("/instances").await
    }

    pub async fn get_instance(&self, id_or_name: &str) -> SdkResult<Instance> {
        self.get(&format!("/instances/{id_or_name}")).await
    }

    pub async fn launch_instance(&self, req: &LaunchInstanceRequest) -> SdkResult<Instance> {
        self.post("/instances", req).await
    }

    pub async fn stop_instance(&self, id_or_name: &str) -> SdkResult<Instance> {
        self.post(&format!("/instances/{id_or_name}/stop"), &json!({})).await
    }

    pub async fn terminate_instance(&self, id_or_name: &str) -> SdkResult<()> {
        self.delete(&format!("/instances/{id_or_name}")).await
    }

    pub async fn instance_logs(&self, id_or_name: &str) -> SdkResult<String> {
        self.get(&format!("/instances/{id_or_name}/logs")).await
    }
}
