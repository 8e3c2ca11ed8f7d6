//! Wire types returned by the control plane. Mirrors the server's
//! `domain::*` `Serialize` shapes field-for-field rather than importing the
//! server crate, the way `pkg/sdk`'s own `Instance`/`VPC` structs duplicate
//! the Go server's JSON tags instead of sharing a package.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub key: String,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub api_key: ApiKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub image: String,
    pub status: String,
    pub ports: String,
    pub container_id: Option<String>,
    pub vpc_id: Option<Uuid>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vpc {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub network_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingGroup {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub vpc_id: Uuid,
    pub load_balancer_id: Option<Uuid>,
    pub image: String,
    pub ports: String,
    pub min_instances: i32,
    pub max_instances: i32,
    pub desired_count: i32,
    pub current_count: i32,
    pub status: String,
    pub idempotency_key: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingPolicy {
    pub id: Uuid,
    pub scaling_group_id: Uuid,
    pub name: String,
    pub metric_type: String,
    pub target_value: f64,
    pub scale_out_step: i32,
    pub scale_in_step: i32,
    pub cooldown_sec: i32,
    pub last_scaled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
