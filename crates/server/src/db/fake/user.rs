use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::UserRepository;
use crate::domain::User;
use crate::error::{ApiError, ApiResult};

#[derive(Default)]
pub struct FakeUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl FakeUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn create(&self, user: &User) -> ApiResult<()> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(ApiError::Conflict(format!(
                "user '{}' already exists",
                user.email
            )));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ApiResult<User> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("user".into()))
    }

    async fn get_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, user: &User) -> ApiResult<()> {
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id) {
            return Err(ApiError::NotFound("user".into()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }
}
