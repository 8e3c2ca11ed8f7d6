use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::repository::ApiKeyRepository;
use crate::domain::ApiKey;
use crate::error::ApiResult;

pub struct PgApiKeyRepository {
    pool: PgPool,
}

impl PgApiKeyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyRepository for PgApiKeyRepository {
    async fn create(&self, key: &ApiKey) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO api_keys (key, user_id, name, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&key.key)
        .bind(key.user_id)
        .bind(&key.name)
        .bind(key.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                crate::error::ApiError::Conflict("api key collision, retry".into())
            }
            other => other.into(),
        })?;
        Ok(())
    }

    async fn get_by_key(&self, key: &str) -> ApiResult<Option<ApiKey>> {
        let row = sqlx::query_as::<_, ApiKey>("SELECT * FROM api_keys WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
