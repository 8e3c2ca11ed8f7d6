use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MetricSample {
    pub instance_id: Uuid,
    pub cpu_percent: f64,
    pub memory_bytes: i64,
    pub recorded_at: DateTime<Utc>,
}
