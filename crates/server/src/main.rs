//! Composition root: load config, connect Postgres, wire `AppState`, spawn
//! the reconciliation workers, serve HTTP. Mirrors the teacher's `main.rs`
//! shape (config → state → router → `axum::serve` with graceful shutdown);
//! simplified to one tracing phase since `ThecloudConfig` carries no
//! log-format/output section to re-init against.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use thecloud_server::clock::SystemClock;
use thecloud_server::config::ThecloudConfig;
use thecloud_server::db::{postgres, Repos};
use thecloud_server::engine::{ContainerEngine, FakeEngine, LiveEngine};
use thecloud_server::http::{build_router, AppState};
use thecloud_server::metrics::Metrics;
use thecloud_server::workers::{AutoscalingWorker, LbWorker};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("starting thecloud-server v{}", env!("CARGO_PKG_VERSION"));

    let config = ThecloudConfig::load().context("failed to load configuration")?;
    let migrate_only = std::env::args().any(|a| a == "--migrate-only");

    let pool = postgres::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    postgres::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    if migrate_only {
        info!("migrations applied, exiting (--migrate-only)");
        return Ok(());
    }

    let repos = build_repos(pool);
    let engine = build_engine(&config).context("failed to initialize container engine")?;
    let metrics = Arc::new(Metrics::new());
    let config = Arc::new(config);

    let state = AppState::new(repos.clone(), config.clone(), engine.clone(), metrics.clone());

    let lb_worker = LbWorker::new(repos.clone(), engine.clone(), state.shutdown_tx.subscribe());
    tokio::spawn(lb_worker.run());

    let autoscaling_worker = AutoscalingWorker::new(
        repos,
        state.instances.clone(),
        state.lbs.clone(),
        metrics,
        Arc::new(SystemClock),
        state.shutdown_tx.subscribe(),
    );
    tokio::spawn(autoscaling_worker.run());

    let app = build_router(state.clone());

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!("listening on http://{addr}");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    state.shutdown();
    info!("server shut down gracefully");
    Ok(())
}

fn build_repos(pool: sqlx::PgPool) -> Repos {
    use thecloud_server::db::postgres::*;

    Repos {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        api_keys: Arc::new(PgApiKeyRepository::new(pool.clone())),
        vpcs: Arc::new(PgVpcRepository::new(pool.clone())),
        instances: Arc::new(PgInstanceRepository::new(pool.clone())),
        volumes: Arc::new(PgVolumeRepository::new(pool.clone())),
        lbs: Arc::new(PgLbRepository::new(pool.clone())),
        scaling: Arc::new(PgScalingRepository::new(pool.clone())),
        metric_samples: Arc::new(PgMetricRepository::new(pool.clone())),
        databases: Arc::new(PgDatabaseRepository::new(pool.clone())),
        caches: Arc::new(PgCacheRepository::new(pool.clone())),
        functions: Arc::new(PgFunctionRepository::new(pool.clone())),
        secrets: Arc::new(PgSecretRepository::new(pool.clone())),
        storage: Arc::new(PgStorageRepository::new(pool.clone())),
        events: Arc::new(PgEventRepository::new(pool)),
    }
}

fn build_engine(config: &ThecloudConfig) -> Result<Arc<dyn ContainerEngine>> {
    if config.environment == thecloud_server::config::Environment::Development
        && config.docker_socket.is_empty()
    {
        warn!("DOCKER_SOCKET not set, using the in-memory fake container engine");
        return Ok(Arc::new(FakeEngine::new()));
    }

    let engine = LiveEngine::connect(&config.docker_socket)
        .map_err(|e| anyhow::anyhow!("docker connect failed: {e}"))?;
    Ok(Arc::new(engine))
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,thecloud_server=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => warn!("received SIGTERM, initiating graceful shutdown"),
    }
}
