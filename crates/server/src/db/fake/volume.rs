use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::VolumeRepository;
use crate::domain::Volume;
use crate::error::{ApiError, ApiResult};

#[derive(Default)]
pub struct FakeVolumeRepository {
    volumes: Mutex<HashMap<Uuid, Volume>>,
}

impl FakeVolumeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VolumeRepository for FakeVolumeRepository {
    async fn create(&self, vol: &Volume) -> ApiResult<()> {
        let mut volumes = self.volumes.lock().unwrap();
        if volumes
            .values()
            .any(|v| v.user_id == vol.user_id && v.name == vol.name)
        {
            return Err(ApiError::Conflict(format!("volume '{}' already exists", vol.name)));
        }
        volumes.insert(vol.id, vol.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<Volume> {
        self.volumes
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("volume".into()))
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Volume>> {
        Ok(self
            .volumes
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, vol: &mut Volume) -> ApiResult<()> {
        let mut volumes = self.volumes.lock().unwrap();
        let current = volumes
            .get(&vol.id)
            .ok_or_else(|| ApiError::NotFound("volume".into()))?;
        if current.version != vol.version {
            return Err(ApiError::Conflict("volume".into()));
        }
        vol.version += 1;
        volumes.insert(vol.id, vol.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        if self.volumes.lock().unwrap().remove(&id).is_none() {
            return Err(ApiError::NotFound("volume".into()));
        }
        Ok(())
    }
}
