//! Mirrors `pkg/sdk/vpc_test.go`'s expected `Client` surface.

use serde_json::json;
use uuid::Uuid;

use crate::client::{Client, SdkResult};
use crate::models::Vpc;

impl Client {
    pub async fn list_vpcs(&self) -> SdkResult<Vec<Vpc>> {
        self.get("/vpcs").await
    }

    pub async fn create_vpc(&self, name: &str) -> SdkResult<Vpc> {
        self.post("/vpcs", &json!({ "name": name })).await
    }

    pub async fn get_vpc(&self, id: Uuid) -> SdkResult<Vpc> {
        self.get(&format!("/vpcs/{id}")).await
    }

    pub async fn delete_vpc(&self, id: Uuid) -> SdkResult<()> {
        self.delete(&format!("/vpcs/{id}")).await
    }
}
