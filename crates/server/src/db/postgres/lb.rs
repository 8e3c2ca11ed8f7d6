use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::repository::LbRepository;
use crate::domain::{LbTarget, LoadBalancer};
use crate::error::{ApiError, ApiResult};

pub struct PgLbRepository {
    pool: PgPool,
}

impl PgLbRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LbRepository for PgLbRepository {
    async fn create(&self, lb: &LoadBalancer) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO load_balancers
                (id, user_id, name, vpc_id, port, algorithm, status, idempotency_key, container_id, version, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(lb.id)
        .bind(lb.user_id)
        .bind(&lb.name)
        .bind(lb.vpc_id)
        .bind(lb.port)
        .bind(lb.algorithm)
        .bind(lb.status)
        .bind(&lb.idempotency_key)
        .bind(&lb.container_id)
        .bind(lb.version)
        .bind(lb.created_at)
        .bind(lb.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                ApiError::Conflict(format!("idempotency key already used for '{}'", lb.name))
            }
            other => other.into(),
        })?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<LoadBalancer> {
        let lb = sqlx::query_as::<_, LoadBalancer>("SELECT * FROM load_balancers WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => ApiError::LbNotFound(id.to_string()),
                other => other.into(),
            })?;
        Ok(lb)
    }

    async fn get_by_idempotency_key(&self, key: &str) -> ApiResult<Option<LoadBalancer>> {
        let lb = sqlx::query_as::<_, LoadBalancer>(
            "SELECT * FROM load_balancers WHERE idempotency_key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lb)
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<LoadBalancer>> {
        let rows = sqlx::query_as::<_, LoadBalancer>(
            "SELECT * FROM load_balancers WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_all(&self) -> ApiResult<Vec<LoadBalancer>> {
        let rows = sqlx::query_as::<_, LoadBalancer>(
            "SELECT * FROM load_balancers ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, lb: &mut LoadBalancer) -> ApiResult<()> {
        let result = sqlx::query(
            "UPDATE load_balancers
               SET status = $3, container_id = $4, version = version + 1, updated_at = $5
             WHERE id = $1 AND version = $2",
        )
        .bind(lb.id)
        .bind(lb.version)
        .bind(lb.status)
        .bind(&lb.container_id)
        .bind(lb.updated_at)
        .execute(&self.pool)
        .await?;
        crate::db::conflict_if_zero(result.rows_affected(), "load balancer")?;
        lb.version += 1;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        // Target rows cascade via FK ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM load_balancers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        crate::db::not_found_if_zero(result.rows_affected(), "load balancer")?;
        Ok(())
    }

    async fn add_target(&self, target: &LbTarget) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO lb_targets (lb_id, instance_id, port, weight, health)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(target.lb_id)
        .bind(target.instance_id)
        .bind(target.port)
        .bind(target.weight)
        .bind(target.health)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                ApiError::LbTargetExists(target.instance_id.to_string())
            }
            other => other.into(),
        })?;
        Ok(())
    }

    async fn remove_target(&self, lb_id: Uuid, instance_id: Uuid) -> ApiResult<()> {
        let result = sqlx::query(
            "DELETE FROM lb_targets WHERE lb_id = $1 AND instance_id = $2",
        )
        .bind(lb_id)
        .bind(instance_id)
        .execute(&self.pool)
        .await?;
        crate::db::not_found_if_zero(result.rows_affected(), "lb target")?;
        Ok(())
    }

    async fn list_targets(&self, lb_id: Uuid) -> ApiResult<Vec<LbTarget>> {
        let rows = sqlx::query_as::<_, LbTarget>("SELECT * FROM lb_targets WHERE lb_id = $1")
            .bind(lb_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn target_exists(&self, lb_id: Uuid, instance_id: Uuid) -> ApiResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM lb_targets WHERE lb_id = $1 AND instance_id = $2",
        )
        .bind(lb_id)
        .bind(instance_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }
}
