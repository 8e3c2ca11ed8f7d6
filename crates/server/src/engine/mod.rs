//! Container engine abstraction — the control plane's equivalent of the
//! teacher's `DockerOps` (crates/agent/src/client/docker.rs), narrowed to the
//! handful of lifecycle operations instances, load balancers, databases,
//! caches, and functions actually need. `live` backs it with `bollard`
//! against the real Docker daemon; `fake` is the deterministic test double.

mod fake;
mod live;

pub use fake::FakeEngine;
pub use live::LiveEngine;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine connection failed: {0}")]
    ConnectionFailed(String),
    #[error("container not found: {0}")]
    ContainerNotFound(String),
    #[error("engine error: {0}")]
    Bollard(#[from] bollard::errors::Error),
}

/// Port and environment spec for launching a container.
#[derive(Debug, Clone, Default)]
pub struct ContainerSpec {
    pub image: String,
    pub name: String,
    /// `(host_port, container_port)` pairs.
    pub ports: Vec<(u16, u16)>,
    pub env: HashMap<String, String>,
    pub volume_binds: Vec<String>,
    pub network: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineContainerState {
    Running,
    Exited,
    Missing,
}

/// Unified async interface over the container runtime. Object-safe via
/// `async_trait`; every method takes `&self` so engines live behind `Arc`.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    async fn run_container(&self, spec: &ContainerSpec) -> Result<String, EngineError>;
    async fn stop_container(&self, container_id: &str) -> Result<(), EngineError>;
    async fn remove_container(&self, container_id: &str, force: bool) -> Result<(), EngineError>;
    async fn inspect_state(&self, container_id: &str) -> Result<EngineContainerState, EngineError>;
    /// Tail of stdout+stderr, newest last. Mirrors the teacher's
    /// `stream_logs`, collapsed to a single snapshot since the HTTP surface
    /// here returns logs as one JSON string rather than a stream.
    async fn fetch_logs(&self, container_id: &str, tail_lines: usize) -> Result<String, EngineError>;

    async fn create_volume(&self, name: &str) -> Result<(), EngineError>;
    async fn remove_volume(&self, name: &str, force: bool) -> Result<(), EngineError>;

    async fn create_network(&self, name: &str) -> Result<String, EngineError>;
    async fn remove_network(&self, network_id: &str) -> Result<(), EngineError>;

    async fn pull_image(&self, image: &str) -> Result<(), EngineError>;
}
