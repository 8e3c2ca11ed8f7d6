use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::repository::InstanceRepository;
use crate::domain::{Instance, VolumeAttachment};
use crate::error::{ApiError, ApiResult};

pub struct PgInstanceRepository {
    pool: PgPool,
}

impl PgInstanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InstanceRepository for PgInstanceRepository {
    async fn create(&self, inst: &Instance) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO instances
                (id, user_id, name, image, status, ports, container_id, vpc_id, version, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(inst.id)
        .bind(inst.user_id)
        .bind(&inst.name)
        .bind(&inst.image)
        .bind(inst.status)
        .bind(&inst.ports)
        .bind(&inst.container_id)
        .bind(inst.vpc_id)
        .bind(inst.version)
        .bind(inst.created_at)
        .bind(inst.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                ApiError::Conflict(format!("instance '{}' already exists", inst.name))
            }
            other => other.into(),
        })?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<Instance> {
        let inst = sqlx::query_as::<_, Instance>("SELECT * FROM instances WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(inst)
    }

    async fn get_by_name(&self, user_id: Uuid, name: &str) -> ApiResult<Instance> {
        let inst = sqlx::query_as::<_, Instance>(
            "SELECT * FROM instances WHERE user_id = $1 AND name = $2",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(inst)
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Instance>> {
        let rows = sqlx::query_as::<_, Instance>(
            "SELECT * FROM instances WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, inst: &mut Instance) -> ApiResult<()> {
        let result = sqlx::query(
            "UPDATE instances
               SET status = $3, container_id = $4, vpc_id = $5, version = version + 1, updated_at = $6
             WHERE id = $1 AND version = $2",
        )
        .bind(inst.id)
        .bind(inst.version)
        .bind(inst.status)
        .bind(&inst.container_id)
        .bind(inst.vpc_id)
        .bind(inst.updated_at)
        .execute(&self.pool)
        .await?;
        crate::db::conflict_if_zero(result.rows_affected(), "instance")?;
        inst.version += 1;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        crate::db::not_found_if_zero(result.rows_affected(), "instance")?;
        Ok(())
    }

    async fn attach_volume(&self, attachment: &VolumeAttachment) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO volume_attachments (instance_id, volume_id, mount_path)
             VALUES ($1, $2, $3)",
        )
        .bind(attachment.instance_id)
        .bind(attachment.volume_id)
        .bind(&attachment.mount_path)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn detach_volume(&self, instance_id: Uuid, volume_id: Uuid) -> ApiResult<()> {
        sqlx::query(
            "DELETE FROM volume_attachments WHERE instance_id = $1 AND volume_id = $2",
        )
        .bind(instance_id)
        .bind(volume_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
