use std::sync::Arc;

use uuid::Uuid;

use crate::db::Repos;
use crate::domain::{Volume, VolumeStatus};
use crate::engine::ContainerEngine;
use crate::error::{ApiError, ApiResult};

pub struct VolumeService {
    repos: Repos,
    engine: Arc<dyn ContainerEngine>,
}

impl VolumeService {
    pub fn new(repos: Repos, engine: Arc<dyn ContainerEngine>) -> Self {
        Self { repos, engine }
    }

    pub async fn create(&self, user_id: Uuid, name: &str, size_gb: i32) -> ApiResult<Volume> {
        let engine_name = format!("thecloud-vol-{name}");
        self.engine
            .create_volume(&engine_name)
            .await
            .map_err(ApiError::internal)?;

        let now = chrono::Utc::now();
        let volume = Volume {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            size_gb,
            status: VolumeStatus::Available,
            instance_id: None,
            mount_path: None,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.repos.volumes.create(&volume).await?;
        Ok(volume)
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<Volume> {
        self.repos.volumes.get_by_id(id).await
    }

    pub async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Volume>> {
        self.repos.volumes.list(user_id).await
    }

    /// Attaches a volume to an instance, setting `instance_id` and
    /// `mount_path` atomically.
    pub async fn attach(&self, id: Uuid, instance_id: Uuid, mount_path: &str) -> ApiResult<Volume> {
        let mut volume = self.repos.volumes.get_by_id(id).await?;
        if volume.status == VolumeStatus::InUse {
            return Err(ApiError::Conflict(format!("volume '{}' already attached", volume.name)));
        }
        volume.status = VolumeStatus::InUse;
        volume.instance_id = Some(instance_id);
        volume.mount_path = Some(mount_path.to_string());
        self.repos.volumes.update(&mut volume).await?;

        self.repos
            .instances
            .attach_volume(&crate::domain::VolumeAttachment {
                instance_id,
                volume_id: id,
                mount_path: mount_path.to_string(),
            })
            .await?;
        Ok(volume)
    }

    pub async fn detach(&self, id: Uuid) -> ApiResult<Volume> {
        let mut volume = self.repos.volumes.get_by_id(id).await?;
        let Some(instance_id) = volume.instance_id else {
            return Ok(volume);
        };
        self.repos.instances.detach_volume(instance_id, id).await?;
        volume.status = VolumeStatus::Available;
        volume.instance_id = None;
        volume.mount_path = None;
        self.repos.volumes.update(&mut volume).await?;
        Ok(volume)
    }

    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let volume = self.repos.volumes.get_by_id(id).await?;
        if volume.status == VolumeStatus::InUse {
            return Err(ApiError::Conflict(format!(
                "volume '{}' is attached to an instance",
                volume.name
            )));
        }
        let engine_name = format!("thecloud-vol-{}", volume.name);
        let _ = self.engine.remove_volume(&engine_name, true).await;
        self.repos.volumes.delete(id).await?;
        Ok(())
    }
}
