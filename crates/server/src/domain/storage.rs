use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StorageObject {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bucket: String,
    pub key: String,
    pub size_bytes: i64,
    pub content_type: String,
    pub path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
