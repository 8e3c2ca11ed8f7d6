use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ContainerEngine, ContainerSpec, EngineContainerState, EngineError};

#[derive(Clone, Debug)]
struct FakeContainer {
    running: bool,
    logs: Vec<String>,
}

/// Deterministic in-memory test double for [`ContainerEngine`], mirroring
/// the teacher's `FakeDocker`.
#[derive(Default)]
pub struct FakeEngine {
    containers: Mutex<HashMap<String, FakeContainer>>,
    volumes: Mutex<Vec<String>>,
    networks: Mutex<Vec<String>>,
    counter: AtomicU64,
    /// When set, `run_container` fails every call — used to exercise
    /// engine-failure paths (instance ends up in ERROR status).
    pub fail_next_run: std::sync::atomic::AtomicBool,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("fake-container-{n}")
    }
}

#[async_trait]
impl ContainerEngine for FakeEngine {
    async fn run_container(&self, spec: &ContainerSpec) -> Result<String, EngineError> {
        if self.fail_next_run.swap(false, Ordering::SeqCst) {
            return Err(EngineError::ConnectionFailed("simulated failure".into()));
        }
        let id = self.next_id();
        self.containers.lock().await.insert(
            id.clone(),
            FakeContainer {
                running: true,
                logs: vec![format!("started {} from image {}", id, spec.image)],
            },
        );
        Ok(id)
    }

    async fn stop_container(&self, container_id: &str) -> Result<(), EngineError> {
        let mut containers = self.containers.lock().await;
        let container = containers
            .get_mut(container_id)
            .ok_or_else(|| EngineError::ContainerNotFound(container_id.to_string()))?;
        container.running = false;
        Ok(())
    }

    async fn remove_container(&self, container_id: &str, force: bool) -> Result<(), EngineError> {
        let mut containers = self.containers.lock().await;
        match containers.remove(container_id) {
            Some(c) if c.running && !force => {
                containers.insert(container_id.to_string(), c);
                Err(EngineError::ConnectionFailed(
                    "container is running, use force".into(),
                ))
            }
            Some(_) => Ok(()),
            None => Err(EngineError::ContainerNotFound(container_id.to_string())),
        }
    }

    async fn inspect_state(&self, container_id: &str) -> Result<EngineContainerState, EngineError> {
        let containers = self.containers.lock().await;
        Ok(match containers.get(container_id) {
            Some(c) if c.running => EngineContainerState::Running,
            Some(_) => EngineContainerState::Exited,
            None => EngineContainerState::Missing,
        })
    }

    async fn fetch_logs(&self, container_id: &str, tail_lines: usize) -> Result<String, EngineError> {
        let containers = self.containers.lock().await;
        let container = containers
            .get(container_id)
            .ok_or_else(|| EngineError::ContainerNotFound(container_id.to_string()))?;
        let start = container.logs.len().saturating_sub(tail_lines);
        Ok(container.logs[start..].join("\n"))
    }

    async fn create_volume(&self, name: &str) -> Result<(), EngineError> {
        self.volumes.lock().await.push(name.to_string());
        Ok(())
    }

    async fn remove_volume(&self, name: &str, _force: bool) -> Result<(), EngineError> {
        self.volumes.lock().await.retain(|v| v != name);
        Ok(())
    }

    async fn create_network(&self, name: &str) -> Result<String, EngineError> {
        let id = format!("fake-network-{}", self.next_id());
        self.networks.lock().await.push(id.clone());
        let _ = name;
        Ok(id)
    }

    async fn remove_network(&self, network_id: &str) -> Result<(), EngineError> {
        self.networks.lock().await.retain(|n| n != network_id);
        Ok(())
    }

    async fn pull_image(&self, _image: &str) -> Result<(), EngineError> {
        Ok(())
    }
}
