use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::repository::SecretRepository;
use crate::domain::Secret;
use crate::error::{ApiError, ApiResult};

pub struct PgSecretRepository {
    pool: PgPool,
}

impl PgSecretRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SecretRepository for PgSecretRepository {
    async fn create(&self, secret: &Secret) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO secrets
                (id, user_id, name, encrypted_value, description, last_accessed_at, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(secret.id)
        .bind(secret.user_id)
        .bind(&secret.name)
        .bind(&secret.encrypted_value)
        .bind(&secret.description)
        .bind(secret.last_accessed_at)
        .bind(secret.created_at)
        .bind(secret.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref d) if d.is_unique_violation() => {
                ApiError::Conflict(format!("secret '{}' already exists", secret.name))
            }
            other => other.into(),
        })?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<Secret> {
        let secret = sqlx::query_as::<_, Secret>("SELECT * FROM secrets WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(secret)
    }

    async fn get_by_name(&self, user_id: Uuid, name: &str) -> ApiResult<Option<Secret>> {
        let secret = sqlx::query_as::<_, Secret>(
            "SELECT * FROM secrets WHERE user_id = $1 AND name = $2",
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(secret)
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Secret>> {
        let rows = sqlx::query_as::<_, Secret>(
            "SELECT * FROM secrets WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn touch_accessed(&self, id: Uuid) -> ApiResult<()> {
        sqlx::query("UPDATE secrets SET last_accessed_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM secrets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        crate::db::not_found_if_zero(result.rows_affected(), "secret")?;
        Ok(())
    }
}
