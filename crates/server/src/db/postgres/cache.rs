use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::repository::CacheRepository;
use crate::domain::Cache;
use crate::error::{ApiError, ApiResult};

pub struct PgCacheRepository {
    pool: PgPool,
}

impl PgCacheRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheRepository for PgCacheRepository {
    async fn create(&self, cache: &Cache) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO caches
                (id, user_id, name, engine, version, status, vpc_id, container_id, port, credentials, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(cache.id)
        .bind(cache.user_id)
        .bind(&cache.name)
        .bind(cache.engine)
        .bind(&cache.version)
        .bind(cache.status)
        .bind(cache.vpc_id)
        .bind(&cache.container_id)
        .bind(cache.port)
        .bind(&cache.credentials)
        .bind(cache.created_at)
        .bind(cache.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref d) if d.is_unique_violation() => {
                ApiError::Conflict(format!("cache '{}' already exists", cache.name))
            }
            other => other.into(),
        })?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<Cache> {
        let cache = sqlx::query_as::<_, Cache>("SELECT * FROM caches WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(cache)
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Cache>> {
        let rows = sqlx::query_as::<_, Cache>(
            "SELECT * FROM caches WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, cache: &Cache) -> ApiResult<()> {
        let result = sqlx::query(
            "UPDATE caches SET status = $2, container_id = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(cache.id)
        .bind(cache.status)
        .bind(&cache.container_id)
        .bind(cache.updated_at)
        .execute(&self.pool)
        .await?;
        crate::db::not_found_if_zero(result.rows_affected(), "cache")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM caches WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        crate::db::not_found_if_zero(result.rows_affected(), "cache")?;
        Ok(())
    }
}
