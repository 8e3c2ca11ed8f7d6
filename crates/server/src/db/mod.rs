pub mod fake;
pub mod postgres;
pub mod repository;

pub use repository::*;

use std::sync::Arc;

use crate::error::ApiError;

/// Bundles every repository trait object behind one handle so services and
/// `AppState` don't each carry thirteen separate `Arc<dyn _>` fields.
#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn UserRepository>,
    pub api_keys: Arc<dyn ApiKeyRepository>,
    pub vpcs: Arc<dyn VpcRepository>,
    pub instances: Arc<dyn InstanceRepository>,
    pub volumes: Arc<dyn VolumeRepository>,
    pub lbs: Arc<dyn LbRepository>,
    pub scaling: Arc<dyn ScalingRepository>,
    pub metric_samples: Arc<dyn MetricRepository>,
    pub databases: Arc<dyn DatabaseRepository>,
    pub caches: Arc<dyn CacheRepository>,
    pub functions: Arc<dyn FunctionRepository>,
    pub secrets: Arc<dyn SecretRepository>,
    pub storage: Arc<dyn StorageRepository>,
    pub events: Arc<dyn EventRepository>,
}

/// Shared optimistic-concurrency check: a versioned `UPDATE`/`DELETE` that
/// affects zero rows means either the row is gone (`NOT_FOUND`) or another
/// writer won the race (`CONFLICT`) — callers pick which by context.
pub fn conflict_if_zero(rows_affected: u64, what: &str) -> Result<(), ApiError> {
    if rows_affected == 0 {
        Err(ApiError::Conflict(format!(
            "{what} was concurrently modified; retry with a fresh read"
        )))
    } else {
        Ok(())
    }
}

pub fn not_found_if_zero(rows_affected: u64, what: &str) -> Result<(), ApiError> {
    if rows_affected == 0 {
        Err(ApiError::NotFound(format!("{what} not found")))
    } else {
        Ok(())
    }
}
