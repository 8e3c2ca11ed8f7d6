use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::repository::VpcRepository;
use crate::domain::Vpc;
use crate::error::{ApiError, ApiResult};

pub struct PgVpcRepository {
    pool: PgPool,
}

impl PgVpcRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VpcRepository for PgVpcRepository {
    async fn create(&self, vpc: &Vpc) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO vpcs (id, user_id, name, network_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(vpc.id)
        .bind(vpc.user_id)
        .bind(&vpc.name)
        .bind(&vpc.network_id)
        .bind(vpc.created_at)
        .bind(vpc.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                ApiError::Conflict(format!("vpc '{}' already exists", vpc.name))
            }
            other => other.into(),
        })?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<Vpc> {
        let vpc = sqlx::query_as::<_, Vpc>("SELECT * FROM vpcs WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(vpc)
    }

    async fn get_by_name(&self, user_id: Uuid, name: &str) -> ApiResult<Vpc> {
        let vpc =
            sqlx::query_as::<_, Vpc>("SELECT * FROM vpcs WHERE user_id = $1 AND name = $2")
                .bind(user_id)
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(vpc)
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Vpc>> {
        let vpcs = sqlx::query_as::<_, Vpc>(
            "SELECT * FROM vpcs WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(vpcs)
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM vpcs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        crate::db::not_found_if_zero(result.rows_affected(), "vpc")?;
        Ok(())
    }

    async fn count_dependents(&self, vpc_id: Uuid) -> ApiResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT
                (SELECT count(*) FROM instances WHERE vpc_id = $1) +
                (SELECT count(*) FROM load_balancers WHERE vpc_id = $1 AND status != 'DELETED') +
                (SELECT count(*) FROM scaling_groups WHERE vpc_id = $1 AND status != 'DELETED') +
                (SELECT count(*) FROM databases WHERE vpc_id = $1) +
                (SELECT count(*) FROM caches WHERE vpc_id = $1)",
        )
        .bind(vpc_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
