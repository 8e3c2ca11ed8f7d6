//! Postgres-backed repository implementations. Every `update()` follows the
//! same optimistic-concurrency shape: `UPDATE … SET version = version + 1
//! WHERE id = $1 AND version = $2`, with zero affected rows mapped to
//! `ApiError::Conflict` — grounded on
//! `examples/original_source/internal/repositories/postgres/*_test.go`.

mod api_key;
mod cache;
mod database;
mod event;
mod function;
mod instance;
mod lb;
mod metric;
mod scaling;
mod secret;
mod storage;
mod user;
mod volume;
mod vpc;

pub use api_key::PgApiKeyRepository;
pub use cache::PgCacheRepository;
pub use database::PgDatabaseRepository;
pub use event::PgEventRepository;
pub use function::PgFunctionRepository;
pub use instance::PgInstanceRepository;
pub use lb::PgLbRepository;
pub use metric::PgMetricRepository;
pub use scaling::PgScalingRepository;
pub use secret::PgSecretRepository;
pub use storage::PgStorageRepository;
pub use user::PgUserRepository;
pub use volume::PgVolumeRepository;
pub use vpc::PgVpcRepository;

use sqlx::postgres::{PgPoolOptions, PgPool};
use std::time::Duration;

pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
