use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::repository::MetricRepository;
use crate::domain::MetricSample;
use crate::error::ApiResult;

pub struct PgMetricRepository {
    pool: PgPool,
}

impl PgMetricRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetricRepository for PgMetricRepository {
    async fn record(&self, sample: &MetricSample) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO metric_samples (instance_id, cpu_percent, memory_bytes, recorded_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(sample.instance_id)
        .bind(sample.cpu_percent)
        .bind(sample.memory_bytes)
        .bind(sample.recorded_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn average_cpu(&self, instance_ids: &[Uuid], window_secs: i64) -> ApiResult<Option<f64>> {
        if instance_ids.is_empty() {
            return Ok(None);
        }
        let avg: Option<f64> = sqlx::query_scalar(
            "SELECT avg(cpu_percent) FROM metric_samples
              WHERE instance_id = ANY($1)
                AND recorded_at > now() - ($2 || ' seconds')::interval",
        )
        .bind(instance_ids)
        .bind(window_secs.to_string())
        .fetch_one(&self.pool)
        .await?;
        Ok(avg)
    }
}
