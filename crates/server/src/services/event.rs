//! Read side of the append-only event log. Writers append directly through
//! `Repos::events` from each domain service; this service only serves
//! `/events` and backs the dashboard summary/stream.

use crate::db::Repos;
use crate::domain::Event;
use crate::error::ApiResult;

const DEFAULT_LIST_LIMIT: i64 = 100;

pub struct EventService {
    repos: Repos,
}

impl EventService {
    pub fn new(repos: Repos) -> Self {
        Self { repos }
    }

    pub async fn list_recent(&self, limit: Option<i64>) -> ApiResult<Vec<Event>> {
        self.repos.events.list_recent(limit.unwrap_or(DEFAULT_LIST_LIMIT)).await
    }
}
