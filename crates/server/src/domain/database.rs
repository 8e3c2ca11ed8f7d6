use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DbEngine {
    Postgres,
    Mysql,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ManagedStatus {
    Creating,
    Running,
    Stopped,
    Deleting,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Database {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub engine: DbEngine,
    pub version: String,
    pub status: ManagedStatus,
    pub vpc_id: Option<Uuid>,
    pub container_id: Option<String>,
    pub port: i32,
    pub credentials: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Database {
    pub fn connection_string(&self) -> String {
        let scheme = match self.engine {
            DbEngine::Postgres => "postgres",
            DbEngine::Mysql => "mysql",
        };
        format!(
            "{scheme}://{creds}@{name}:{port}/{name}",
            scheme = scheme,
            creds = self.credentials,
            name = self.name,
            port = self.port,
        )
    }
}
