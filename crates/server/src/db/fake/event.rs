use std::sync::Mutex;

use async_trait::async_trait;

use crate::db::repository::EventRepository;
use crate::domain::Event;
use crate::error::ApiResult;

#[derive(Default)]
pub struct FakeEventRepository {
    events: Mutex<Vec<Event>>,
}

impl FakeEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for FakeEventRepository {
    async fn append(&self, event: &Event) -> ApiResult<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> ApiResult<Vec<Event>> {
        let events = self.events.lock().unwrap();
        Ok(events
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}
