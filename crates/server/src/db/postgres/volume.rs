use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::repository::VolumeRepository;
use crate::domain::Volume;
use crate::error::{ApiError, ApiResult};

pub struct PgVolumeRepository {
    pool: PgPool,
}

impl PgVolumeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VolumeRepository for PgVolumeRepository {
    async fn create(&self, vol: &Volume) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO volumes
                (id, user_id, name, size_gb, status, instance_id, mount_path, version, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(vol.id)
        .bind(vol.user_id)
        .bind(&vol.name)
        .bind(vol.size_gb)
        .bind(vol.status)
        .bind(vol.instance_id)
        .bind(&vol.mount_path)
        .bind(vol.version)
        .bind(vol.created_at)
        .bind(vol.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                ApiError::Conflict(format!("volume '{}' already exists", vol.name))
            }
            other => other.into(),
        })?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<Volume> {
        let vol = sqlx::query_as::<_, Volume>("SELECT * FROM volumes WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(vol)
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Volume>> {
        let rows = sqlx::query_as::<_, Volume>(
            "SELECT * FROM volumes WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, vol: &mut Volume) -> ApiResult<()> {
        let result = sqlx::query(
            "UPDATE volumes
               SET status = $3, instance_id = $4, mount_path = $5, version = version + 1, updated_at = $6
             WHERE id = $1 AND version = $2",
        )
        .bind(vol.id)
        .bind(vol.version)
        .bind(vol.status)
        .bind(vol.instance_id)
        .bind(&vol.mount_path)
        .bind(vol.updated_at)
        .execute(&self.pool)
        .await?;
        crate::db::conflict_if_zero(result.rows_affected(), "volume")?;
        vol.version += 1;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM volumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        crate::db::not_found_if_zero(result.rows_affected(), "volume")?;
        Ok(())
    }
}
