use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum FunctionStatus {
    Active,
    Deleting,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Function {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub runtime: String,
    pub handler: String,
    pub code_path: String,
    pub timeout_sec: i32,
    pub memory_mb: i32,
    pub status: FunctionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum InvocationStatus {
    Running,
    Succeeded,
    Failed,
    Timeout,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invocation {
    pub id: Uuid,
    pub function_id: Uuid,
    pub status: InvocationStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_ms: i64,
    pub status_code: i32,
    pub logs: String,
}
