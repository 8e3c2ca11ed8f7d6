use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ScalingGroupStatus {
    Active,
    Deleting,
    Deleted,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
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
    pub status: ScalingGroupStatus,
    pub idempotency_key: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
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
