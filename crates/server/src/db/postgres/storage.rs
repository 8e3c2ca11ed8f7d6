use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::repository::StorageRepository;
use crate::domain::StorageObject;
use crate::error::ApiResult;

pub struct PgStorageRepository {
    pool: PgPool,
}

impl PgStorageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageRepository for PgStorageRepository {
    async fn put(&self, object: &StorageObject) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO storage_objects
                (id, user_id, bucket, key, size_bytes, content_type, path, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (user_id, bucket, key) DO UPDATE
               SET size_bytes = excluded.size_bytes,
                   content_type = excluded.content_type,
                   path = excluded.path,
                   updated_at = excluded.updated_at",
        )
        .bind(object.id)
        .bind(object.user_id)
        .bind(&object.bucket)
        .bind(&object.key)
        .bind(object.size_bytes)
        .bind(&object.content_type)
        .bind(&object.path)
        .bind(object.created_at)
        .bind(object.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, user_id: Uuid, bucket: &str, key: &str) -> ApiResult<StorageObject> {
        let obj = sqlx::query_as::<_, StorageObject>(
            "SELECT * FROM storage_objects WHERE user_id = $1 AND bucket = $2 AND key = $3",
        )
        .bind(user_id)
        .bind(bucket)
        .bind(key)
        .fetch_one(&self.pool)
        .await?;
        Ok(obj)
    }

    async fn list(&self, user_id: Uuid, bucket: &str) -> ApiResult<Vec<StorageObject>> {
        let rows = sqlx::query_as::<_, StorageObject>(
            "SELECT * FROM storage_objects WHERE user_id = $1 AND bucket = $2 ORDER BY key",
        )
        .bind(user_id)
        .bind(bucket)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete(&self, user_id: Uuid, bucket: &str, key: &str) -> ApiResult<()> {
        let result = sqlx::query(
            "DELETE FROM storage_objects WHERE user_id = $1 AND bucket = $2 AND key = $3",
        )
        .bind(user_id)
        .bind(bucket)
        .bind(key)
        .execute(&self.pool)
        .await?;
        crate::db::not_found_if_zero(result.rows_affected(), "object")?;
        Ok(())
    }
}
