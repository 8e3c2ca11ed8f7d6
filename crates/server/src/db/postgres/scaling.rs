use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::repository::ScalingRepository;
use crate::domain::{ScalingGroup, ScalingPolicy};
use crate::error::{ApiError, ApiResult};

pub struct PgScalingRepository {
    pool: PgPool,
}

impl PgScalingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScalingRepository for PgScalingRepository {
    async fn create_group(&self, group: &ScalingGroup) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO scaling_groups
                (id, user_id, name, vpc_id, load_balancer_id, image, ports, min_instances,
                 max_instances, desired_count, current_count, status, idempotency_key, version,
                 created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(group.id)
        .bind(group.user_id)
        .bind(&group.name)
        .bind(group.vpc_id)
        .bind(group.load_balancer_id)
        .bind(&group.image)
        .bind(&group.ports)
        .bind(group.min_instances)
        .bind(group.max_instances)
        .bind(group.desired_count)
        .bind(group.current_count)
        .bind(group.status)
        .bind(&group.idempotency_key)
        .bind(group.version)
        .bind(group.created_at)
        .bind(group.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                ApiError::Conflict(format!("idempotency key already used for '{}'", group.name))
            }
            other => other.into(),
        })?;
        Ok(())
    }

    async fn get_group_by_id(&self, id: Uuid) -> ApiResult<ScalingGroup> {
        let group =
            sqlx::query_as::<_, ScalingGroup>("SELECT * FROM scaling_groups WHERE id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(group)
    }

    async fn get_group_by_idempotency_key(&self, key: &str) -> ApiResult<Option<ScalingGroup>> {
        let group = sqlx::query_as::<_, ScalingGroup>(
            "SELECT * FROM scaling_groups WHERE idempotency_key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(group)
    }

    async fn list_groups(&self, user_id: Uuid) -> ApiResult<Vec<ScalingGroup>> {
        let rows = sqlx::query_as::<_, ScalingGroup>(
            "SELECT * FROM scaling_groups WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_active_groups(&self) -> ApiResult<Vec<ScalingGroup>> {
        let rows = sqlx::query_as::<_, ScalingGroup>(
            "SELECT * FROM scaling_groups WHERE status = 'ACTIVE' ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_deleting_groups(&self) -> ApiResult<Vec<ScalingGroup>> {
        let rows = sqlx::query_as::<_, ScalingGroup>(
            "SELECT * FROM scaling_groups WHERE status = 'DELETING' ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_groups_by_vpc(&self, vpc_id: Uuid) -> ApiResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM scaling_groups WHERE vpc_id = $1 AND status != 'DELETED'",
        )
        .bind(vpc_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn update_group(&self, group: &mut ScalingGroup) -> ApiResult<()> {
        let result = sqlx::query(
            "UPDATE scaling_groups
               SET desired_count = $3, current_count = $4, status = $5, version = version + 1, updated_at = $6
             WHERE id = $1 AND version = $2",
        )
        .bind(group.id)
        .bind(group.version)
        .bind(group.desired_count)
        .bind(group.current_count)
        .bind(group.status)
        .bind(group.updated_at)
        .execute(&self.pool)
        .await?;
        crate::db::conflict_if_zero(result.rows_affected(), "scaling group")?;
        group.version += 1;
        Ok(())
    }

    async fn delete_group(&self, id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM scaling_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        crate::db::not_found_if_zero(result.rows_affected(), "scaling group")?;
        Ok(())
    }

    async fn add_member(&self, group_id: Uuid, instance_id: Uuid) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO scaling_group_instances (group_id, instance_id) VALUES ($1, $2)",
        )
        .bind(group_id)
        .bind(instance_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_member(&self, group_id: Uuid, instance_id: Uuid) -> ApiResult<()> {
        sqlx::query(
            "DELETE FROM scaling_group_instances WHERE group_id = $1 AND instance_id = $2",
        )
        .bind(group_id)
        .bind(instance_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_members(&self, group_id: Uuid) -> ApiResult<Vec<Uuid>> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT instance_id FROM scaling_group_instances WHERE group_id = $1",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn create_policy(&self, policy: &ScalingPolicy) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO scaling_policies
                (id, scaling_group_id, name, metric_type, target_value, scale_out_step,
                 scale_in_step, cooldown_sec, last_scaled_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(policy.id)
        .bind(policy.scaling_group_id)
        .bind(&policy.name)
        .bind(&policy.metric_type)
        .bind(policy.target_value)
        .bind(policy.scale_out_step)
        .bind(policy.scale_in_step)
        .bind(policy.cooldown_sec)
        .bind(policy.last_scaled_at)
        .bind(policy.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_policy(&self, id: Uuid) -> ApiResult<ScalingPolicy> {
        let policy =
            sqlx::query_as::<_, ScalingPolicy>("SELECT * FROM scaling_policies WHERE id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(policy)
    }

    async fn list_policies(&self, group_id: Uuid) -> ApiResult<Vec<ScalingPolicy>> {
        let rows = sqlx::query_as::<_, ScalingPolicy>(
            "SELECT * FROM scaling_policies WHERE scaling_group_id = $1 ORDER BY created_at ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_policy(&self, policy: &ScalingPolicy) -> ApiResult<()> {
        sqlx::query(
            "UPDATE scaling_policies SET last_scaled_at = $2 WHERE id = $1",
        )
        .bind(policy.id)
        .bind(policy.last_scaled_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_policy(&self, id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM scaling_policies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        crate::db::not_found_if_zero(result.rows_affected(), "scaling policy")?;
        Ok(())
    }
}
