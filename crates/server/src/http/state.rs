//! Shared application state handed to every handler and background worker,
//! mirroring the teacher's `state::AppState` (`Arc`-wrapped config/pool/
//! metrics plus a `watch` shutdown sender) with the dashboard's GraphQL
//! subscription transport replaced by a `broadcast` channel feeding the SSE
//! stream instead.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::SecretCipher;
use crate::config::ThecloudConfig;
use crate::db::Repos;
use crate::domain::Event;
use crate::engine::ContainerEngine;
use crate::metrics::Metrics;
use crate::services::{
    AuthService, CacheService, DatabaseService, EventService, FunctionService, InstanceService,
    LbService, ScalingService, SecretService, StorageService, VolumeService, VpcService,
};

const DASHBOARD_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub repos: Repos,
    pub config: Arc<ThecloudConfig>,
    pub engine: Arc<dyn ContainerEngine>,
    pub metrics: Arc<Metrics>,

    pub auth: Arc<AuthService>,
    pub vpcs: Arc<VpcService>,
    pub instances: Arc<InstanceService>,
    pub volumes: Arc<VolumeService>,
    pub lbs: Arc<LbService>,
    pub scaling: Arc<ScalingService>,
    pub databases: Arc<DatabaseService>,
    pub caches: Arc<CacheService>,
    pub functions: Arc<FunctionService>,
    pub secrets: Arc<SecretService>,
    pub storage: Arc<StorageService>,
    pub events: Arc<EventService>,

    /// Fan-out feed for the dashboard's `/dashboard/events/stream` SSE route.
    /// Lagging subscribers drop old events rather than back-pressure the
    /// workers that publish them.
    pub dashboard_tx: tokio::sync::broadcast::Sender<Event>,
    pub shutdown_tx: tokio::sync::watch::Sender<bool>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repos: Repos,
        config: Arc<ThecloudConfig>,
        engine: Arc<dyn ContainerEngine>,
        metrics: Arc<Metrics>,
    ) -> Self {
        let (dashboard_tx, _) = tokio::sync::broadcast::channel(DASHBOARD_CHANNEL_CAPACITY);
        let (shutdown_tx, _) = tokio::sync::watch::channel(false);

        let auth = Arc::new(AuthService::new(repos.clone()));
        let vpcs = Arc::new(VpcService::new(repos.clone(), engine.clone()));
        let instances = Arc::new(InstanceService::new(repos.clone(), engine.clone()));
        let volumes = Arc::new(VolumeService::new(repos.clone(), engine.clone()));
        let lbs = Arc::new(LbService::new(repos.clone()));
        let scaling = Arc::new(ScalingService::new(repos.clone(), &config));
        let databases = Arc::new(DatabaseService::new(repos.clone(), engine.clone()));
        let caches = Arc::new(CacheService::new(repos.clone(), engine.clone()));
        let functions = Arc::new(FunctionService::new(repos.clone(), engine.clone()));
        let cipher = SecretCipher::new(&config.encryption_secret);
        let secrets = Arc::new(SecretService::new(repos.clone(), cipher));
        let storage = Arc::new(StorageService::new(repos.clone(), config.storage_root.clone()));
        let events = Arc::new(EventService::new(repos.clone()));

        Self {
            repos,
            config,
            engine,
            metrics,
            auth,
            vpcs,
            instances,
            volumes,
            lbs,
            scaling,
            databases,
            caches,
            functions,
            secrets,
            storage,
            events,
            dashboard_tx,
            shutdown_tx,
        }
    }

    /// Publishes an event both to durable storage and the live dashboard
    /// feed. Subscribers with no receivers (no dashboard open) are fine —
    /// `send` on an empty channel is a no-op error we ignore.
    pub async fn publish_event(&self, event: Event) {
        if let Err(e) = self.repos.events.append(&event).await {
            tracing::warn!(error = %e, "failed to persist event");
        }
        let _ = self.dashboard_tx.send(event);
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl FromRef<AppState> for Repos {
    fn from_ref(state: &AppState) -> Self {
        state.repos.clone()
    }
}
