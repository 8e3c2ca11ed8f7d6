use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::repository::FunctionRepository;
use crate::domain::{Function, Invocation};
use crate::error::{ApiError, ApiResult};

pub struct PgFunctionRepository {
    pool: PgPool,
}

impl PgFunctionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FunctionRepository for PgFunctionRepository {
    async fn create(&self, f: &Function) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO functions
                (id, user_id, name, runtime, handler, code_path, timeout_sec, memory_mb, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(f.id)
        .bind(f.user_id)
        .bind(&f.name)
        .bind(&f.runtime)
        .bind(&f.handler)
        .bind(&f.code_path)
        .bind(f.timeout_sec)
        .bind(f.memory_mb)
        .bind(f.status)
        .bind(f.created_at)
        .bind(f.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref d) if d.is_unique_violation() => {
                ApiError::Conflict(format!("function '{}' already exists", f.name))
            }
            other => other.into(),
        })?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<Function> {
        let f = sqlx::query_as::<_, Function>("SELECT * FROM functions WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(f)
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Function>> {
        let rows = sqlx::query_as::<_, Function>(
            "SELECT * FROM functions WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM functions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        crate::db::not_found_if_zero(result.rows_affected(), "function")?;
        Ok(())
    }

    async fn record_invocation(&self, inv: &Invocation) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO invocations
                (id, function_id, status, started_at, ended_at, duration_ms, status_code, logs)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(inv.id)
        .bind(inv.function_id)
        .bind(inv.status)
        .bind(inv.started_at)
        .bind(inv.ended_at)
        .bind(inv.duration_ms)
        .bind(inv.status_code)
        .bind(&inv.logs)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_invocations(&self, function_id: Uuid) -> ApiResult<Vec<Invocation>> {
        let rows = sqlx::query_as::<_, Invocation>(
            "SELECT * FROM invocations WHERE function_id = $1 ORDER BY started_at DESC",
        )
        .bind(function_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
