use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::DatabaseRepository;
use crate::domain::Database;
use crate::error::{ApiError, ApiResult};

#[derive(Default)]
pub struct FakeDatabaseRepository {
    rows: Mutex<HashMap<Uuid, Database>>,
}

impl FakeDatabaseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DatabaseRepository for FakeDatabaseRepository {
    async fn create(&self, db: &Database) -> ApiResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|r| r.user_id == db.user_id && r.name == db.name) {
            return Err(ApiError::Conflict(format!("database '{}' already exists", db.name)));
        }
        rows.insert(db.id, db.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<Database> {
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("database".into()))
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Database>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, db: &Database) -> ApiResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&db.id) {
            return Err(ApiError::NotFound("database".into()));
        }
        rows.insert(db.id, db.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        if self.rows.lock().unwrap().remove(&id).is_none() {
            return Err(ApiError::NotFound("database".into()));
        }
        Ok(())
    }
}
