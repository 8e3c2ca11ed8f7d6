use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::repository::EventRepository;
use crate::domain::Event;
use crate::error::ApiResult;

pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn append(&self, event: &Event) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO events (id, event_type, resource_id, resource_type, metadata, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(event.id)
        .bind(&event.event_type)
        .bind(event.resource_id)
        .bind(&event.resource_type)
        .bind(&event.metadata)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> ApiResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, Event>(
            "SELECT * FROM events ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
