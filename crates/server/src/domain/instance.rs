use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceStatus {
    Starting,
    Running,
    Stopped,
    Error,
}

impl InstanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Starting => "STARTING",
            InstanceStatus::Running => "RUNNING",
            InstanceStatus::Stopped => "STOPPED",
            InstanceStatus::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Instance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub image: String,
    pub status: InstanceStatus,
    /// Comma-separated `host:container` pairs, e.g. "8080:80,8443:443".
    pub ports: String,
    pub container_id: Option<String>,
    pub vpc_id: Option<Uuid>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Instance {
    /// Invariant I6: `status == RUNNING` implies `container_id` is set.
    pub fn check_invariants(&self) -> bool {
        if self.status == InstanceStatus::Running {
            return self.container_id.as_deref().is_some_and(|c| !c.is_empty());
        }
        true
    }
}

/// Parsed `(host_port, container_port)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortBinding {
    pub host_port: u16,
    pub container_port: u16,
}

/// Row of `volume_attachments` — mount of a volume onto an instance.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VolumeAttachment {
    pub instance_id: Uuid,
    pub volume_id: Uuid,
    pub mount_path: String,
}
