use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::FunctionRepository;
use crate::domain::{Function, Invocation};
use crate::error::{ApiError, ApiResult};

#[derive(Default)]
pub struct FakeFunctionRepository {
    rows: Mutex<HashMap<Uuid, Function>>,
    invocations: Mutex<HashMap<Uuid, Vec<Invocation>>>,
}

impl FakeFunctionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FunctionRepository for FakeFunctionRepository {
    async fn create(&self, f: &Function) -> ApiResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|r| r.user_id == f.user_id && r.name == f.name) {
            return Err(ApiError::Conflict(format!("function '{}' already exists", f.name)));
        }
        rows.insert(f.id, f.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<Function> {
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("function".into()))
    }

    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Function>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        if self.rows.lock().unwrap().remove(&id).is_none() {
            return Err(ApiError::NotFound("function".into()));
        }
        self.invocations.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn record_invocation(&self, inv: &Invocation) -> ApiResult<()> {
        self.invocations
            .lock()
            .unwrap()
            .entry(inv.function_id)
            .or_default()
            .push(inv.clone());
        Ok(())
    }

    async fn list_invocations(&self, function_id: Uuid) -> ApiResult<Vec<Invocation>> {
        Ok(self
            .invocations
            .lock()
            .unwrap()
            .get(&function_id)
            .cloned()
            .unwrap_or_default())
    }
}
