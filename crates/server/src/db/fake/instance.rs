use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::InstanceRepository;
use crate::domain::{Instance, VolumeAttachment};
use crate::error::{ApiError, ApiResult};

#[derive(Default)]
pub struct FakeInstanceRepository {
    instances: Mutex<HashMap<Uuid, Instance>>,
    attachments: Mutex<Vec<VolumeAttachment>>,
}

impl FakeInstanceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InstanceRepository for FakeInstanceRepository {
    async fn create(&self, inst: &Instance) -> ApiResult<()> {
        let mut instances = self.instances.lock().unwrap();
        if instances
            .values()
            .any(|i| i.user_id == inst.user_id && i.name == inst.name)
        {
            return Err(ApiError::Conflict(format!(
                "instance '{}' already exists",
                inst.name
            )));
        }
        instances.insert(inst.id, inst.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<Instance> {
        self.instances
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("instance".into()))
    }

    async fn get_by_name(&self, user_id: Uuid, name: &str) -> ApiResult<Instance> {
        self.instances
            .lock()
            .unwrap()
            .values()
            .find(|i| i.user_id == user_id && i.name == name)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("instance".into()))
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Instance>> {
        Ok(self
            .instances
            .lock()
            .unwrap()
            .values()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, inst: &mut Instance) -> ApiResult<()> {
        let mut instances = self.instances.lock().unwrap();
        let current = instances
            .get(&inst.id)
            .ok_or_else(|| ApiError::NotFound("instance".into()))?;
        if current.version != inst.version {
            return Err(ApiError::Conflict("instance".into()));
        }
        inst.version += 1;
        instances.insert(inst.id, inst.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        if self.instances.lock().unwrap().remove(&id).is_none() {
            return Err(ApiError::NotFound("instance".into()));
        }
        Ok(())
    }

    async fn attach_volume(&self, attachment: &VolumeAttachment) -> ApiResult<()> {
        self.attachments.lock().unwrap().push(attachment.clone());
        Ok(())
    }

    async fn detach_volume(&self, instance_id: Uuid, volume_id: Uuid) -> ApiResult<()> {
        self.attachments
            .lock()
            .unwrap()
            .retain(|a| !(a.instance_id == instance_id && a.volume_id == volume_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InstanceStatus;

    fn sample(id: Uuid, user_id: Uuid, version: i32) -> Instance {
        let now = chrono::Utc::now();
        Instance {
            id,
            user_id,
            name: "web-1".into(),
            image: "nginx".into(),
            status: InstanceStatus::Running,
            ports: String::new(),
            container_id: Some("fake-container-1".into()),
            vpc_id: None,
            version,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn update_rejects_stale_version() {
        let repo = FakeInstanceRepository::new();
        let id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        repo.create(&sample(id, user_id, 1)).await.unwrap();

        // Simulate a second writer racing a stale copy against the row: the
        // first update advances version 1 -> 2, the stale caller's retry
        // still carries version 1 and must be rejected.
        let mut first_writer = sample(id, user_id, 1);
        repo.update(&mut first_writer).await.unwrap();
        assert_eq!(first_writer.version, 2);

        let mut stale_writer = sample(id, user_id, 1);
        let err = repo.update(&mut stale_writer).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_succeeds_with_current_version() {
        let repo = FakeInstanceRepository::new();
        let id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        repo.create(&sample(id, user_id, 1)).await.unwrap();

        let mut inst = sample(id, user_id, 1);
        repo.update(&mut inst).await.unwrap();
        assert_eq!(inst.version, 2);
        assert_eq!(repo.get_by_id(id).await.unwrap().version, 2);
    }
}
