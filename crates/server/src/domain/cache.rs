use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::database::ManagedStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CacheEngine {
    Redis,
    Memcached,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Cache {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub engine: CacheEngine,
    pub version: String,
    pub status: ManagedStatus,
    pub vpc_id: Option<Uuid>,
    pub container_id: Option<String>,
    pub port: i32,
    pub credentials: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cache {
    pub fn connection_string(&self) -> String {
        let scheme = match self.engine {
            CacheEngine::Redis => "redis",
            CacheEngine::Memcached => "memcached",
        };
        format!("{scheme}://{}:{}", self.name, self.port)
    }
}
