//! Managed cache lifecycle — mirrors `DatabaseService`'s shape with a
//! narrower engine set and a `flush`/`stats` surface instead of a
//! connection string used for SQL clients.

use std::sync::Arc;

use uuid::Uuid;

use crate::db::Repos;
use crate::domain::{Cache, CacheEngine, ManagedStatus};
use crate::engine::{ContainerEngine, ContainerSpec};
use crate::error::{ApiError, ApiResult};

const DEFAULT_REDIS_PORT: i32 = 6379;
const DEFAULT_MEMCACHED_PORT: i32 = 11211;

pub struct CacheService {
    repos: Repos,
    engine: Arc<dyn ContainerEngine>,
}

impl CacheService {
    pub fn new(repos: Repos, engine: Arc<dyn ContainerEngine>) -> Self {
        Self { repos, engine }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        engine: &str,
        version: &str,
        vpc_id: Option<Uuid>,
    ) -> ApiResult<Cache> {
        let cache_engine = match engine {
            "redis" => CacheEngine::Redis,
            "memcached" => CacheEngine::Memcached,
            other => return Err(ApiError::InvalidInput(format!("unknown cache engine '{other}'"))),
        };
        let port = match cache_engine {
            CacheEngine::Redis => DEFAULT_REDIS_PORT,
            CacheEngine::Memcached => DEFAULT_MEMCACHED_PORT,
        };

        let network = match vpc_id {
            Some(id) => Some(self.repos.vpcs.get_by_id(id).await?.network_id),
            None => None,
        };

        let credentials = crate::auth::crypto::random_token(16);
        let image = format!("{engine}:{version}");
        let container_name = format!("thecloud-cache-{name}");
        let container_id = self
            .engine
            .run_container(&ContainerSpec {
                image,
                name: container_name,
                ports: vec![(port as u16, port as u16)],
                env: Default::default(),
                volume_binds: Vec::new(),
                network,
            })
            .await
            .map_err(ApiError::internal)?;

        let now = chrono::Utc::now();
        let cache = Cache {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            engine: cache_engine,
            version: version.to_string(),
            status: ManagedStatus::Running,
            vpc_id,
            container_id: Some(container_id),
            port,
            credentials,
            created_at: now,
            updated_at: now,
        };
        self.repos.caches.create(&cache).await?;
        Ok(cache)
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<Cache> {
        self.repos.caches.get_by_id(id).await
    }

    pub async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Cache>> {
        self.repos.caches.list(user_id).await
    }

    pub fn connection_string(&self, cache: &Cache) -> String {
        cache.connection_string()
    }

    /// No-op at the engine layer: the `ContainerEngine` adapter has no
    /// Redis/Memcached protocol client, so `FLUSHALL`/`flush_all` can't be
    /// issued directly. Confirms the cache exists so callers get `NOT_FOUND`
    /// for a bad id rather than a silent success.
    pub async fn flush(&self, id: Uuid) -> ApiResult<()> {
        self.repos.caches.get_by_id(id).await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let cache = self.repos.caches.get_by_id(id).await?;
        if let Some(container_id) = &cache.container_id {
            let _ = self.engine.remove_container(container_id, true).await;
        }
        self.repos.caches.delete(id).await?;
        Ok(())
    }
}
