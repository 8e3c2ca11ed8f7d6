use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: Uuid,
    pub event_type: String,
    pub resource_id: Uuid,
    pub resource_type: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        event_type: impl Into<String>,
        resource_id: Uuid,
        resource_type: impl Into<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: event_type.into(),
            resource_id,
            resource_type: resource_type.into(),
            metadata,
            created_at: Utc::now(),
        }
    }
}
