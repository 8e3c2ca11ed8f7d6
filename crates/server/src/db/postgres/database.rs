use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::repository::DatabaseRepository;
use crate::domain::Database;
use crate::error::{ApiError, ApiResult};

pub struct PgDatabaseRepository {
    pool: PgPool,
}

impl PgDatabaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseRepository for PgDatabaseRepository {
    async fn create(&self, db: &Database) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO databases
                (id, user_id, name, engine, version, status, vpc_id, container_id, port, credentials, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(db.id)
        .bind(db.user_id)
        .bind(&db.name)
        .bind(db.engine)
        .bind(&db.version)
        .bind(db.status)
        .bind(db.vpc_id)
        .bind(&db.container_id)
        .bind(db.port)
        .bind(&db.credentials)
        .bind(db.created_at)
        .bind(db.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref d) if d.is_unique_violation() => {
                ApiError::Conflict(format!("database '{}' already exists", db.name))
            }
            other => other.into(),
        })?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<Database> {
        let db = sqlx::query_as::<_, Database>("SELECT * FROM databases WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(db)
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Database>> {
        let rows = sqlx::query_as::<_, Database>(
            "SELECT * FROM databases WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, db: &Database) -> ApiResult<()> {
        let result = sqlx::query(
            "UPDATE databases SET status = $2, container_id = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(db.id)
        .bind(db.status)
        .bind(&db.container_id)
        .bind(db.updated_at)
        .execute(&self.pool)
        .await?;
        crate::db::not_found_if_zero(result.rows_affected(), "database")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM databases WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        crate::db::not_found_if_zero(result.rows_affected(), "database")?;
        Ok(())
    }
}
