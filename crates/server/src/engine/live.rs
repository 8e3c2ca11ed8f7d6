use std::collections::HashMap;

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::Config;
use bollard::models::{HostConfig, PortBinding as BollardPortBinding};
use bollard::query_parameters::{
    CreateContainerOptions, InspectContainerOptions, RemoveContainerOptions,
    StopContainerOptions,
};
use bollard::volume::{CreateVolumeOptions, RemoveVolumeOptions};

use super::{ContainerEngine, ContainerSpec, EngineContainerState, EngineError};

/// Bollard-backed container engine, connected to the local Docker daemon.
pub struct LiveEngine {
    client: Docker,
}

impl LiveEngine {
    pub fn connect(socket_path: &str) -> Result<Self, EngineError> {
        let client = if socket_path.is_empty() {
            Docker::connect_with_defaults()
                .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?
        } else {
            let clean_path = socket_path.trim_start_matches("unix://");
            Docker::connect_with_socket(clean_path, 120, &bollard::API_DEFAULT_VERSION)
                .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?
        };
        Ok(Self { client })
    }

    fn not_found_aware(id: &str, err: bollard::errors::Error) -> EngineError {
        match err {
            bollard::errors::Error::DockerResponseServerError { status_code: 404, .. } => {
                EngineError::ContainerNotFound(id.to_string())
            }
            other => EngineError::Bollard(other),
        }
    }
}

#[async_trait]
impl ContainerEngine for LiveEngine {
    async fn run_container(&self, spec: &ContainerSpec) -> Result<String, EngineError> {
        let mut port_bindings: HashMap<String, Option<Vec<BollardPortBinding>>> = HashMap::new();
        let mut exposed_ports: HashMap<String, HashMap<(), ()>> = HashMap::new();
        for (host_port, container_port) in &spec.ports {
            let key = format!("{container_port}/tcp");
            port_bindings.insert(
                key.clone(),
                Some(vec![BollardPortBinding {
                    host_ip: None,
                    host_port: Some(host_port.to_string()),
                }]),
            );
            exposed_ports.insert(key, HashMap::new());
        }

        let env: Vec<String> = spec
            .env
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();

        let config = Config {
            image: Some(spec.image.clone()),
            env: Some(env),
            exposed_ports: Some(exposed_ports),
            host_config: Some(HostConfig {
                port_bindings: Some(port_bindings),
                binds: Some(spec.volume_binds.clone()),
                network_mode: spec.network.clone(),
                ..Default::default()
            }),
            ..Default::default()
        };

        let options = CreateContainerOptions {
            name: Some(spec.name.clone()),
            ..Default::default()
        };

        let created = self
            .client
            .create_container(Some(options), config)
            .await
            .map_err(|e| Self::not_found_aware(&spec.name, e))?;

        self.client
            .start_container(&created.id, None)
            .await
            .map_err(|e| Self::not_found_aware(&created.id, e))?;

        Ok(created.id)
    }

    async fn stop_container(&self, container_id: &str) -> Result<(), EngineError> {
        let options = Some(StopContainerOptions {
            t: Some(10),
            ..Default::default()
        });
        self.client
            .stop_container(container_id, options)
            .await
            .map_err(|e| Self::not_found_aware(container_id, e))
    }

    async fn remove_container(&self, container_id: &str, force: bool) -> Result<(), EngineError> {
        let options = Some(RemoveContainerOptions {
            force,
            v: true,
            ..Default::default()
        });
        self.client
            .remove_container(container_id, options)
            .await
            .map_err(|e| Self::not_found_aware(container_id, e))
    }

    async fn inspect_state(&self, container_id: &str) -> Result<EngineContainerState, EngineError> {
        let inspect = self
            .client
            .inspect_container(container_id, None::<InspectContainerOptions>)
            .await;
        let inspect = match inspect {
            Ok(i) => i,
            Err(bollard::errors::Error::DockerResponseServerError { status_code: 404, .. }) => {
                return Ok(EngineContainerState::Missing);
            }
            Err(e) => return Err(EngineError::Bollard(e)),
        };
        let running = inspect
            .state
            .and_then(|s| s.running)
            .unwrap_or(false);
        Ok(if running {
            EngineContainerState::Running
        } else {
            EngineContainerState::Exited
        })
    }

    async fn fetch_logs(&self, container_id: &str, tail_lines: usize) -> Result<String, EngineError> {
        use bollard::query_parameters::LogsOptions;
        use futures_util::stream::StreamExt;

        let options = Some(LogsOptions {
            stdout: true,
            stderr: true,
            tail: tail_lines.to_string(),
            ..Default::default()
        });
        let mut stream = self.client.logs(container_id, options);
        let mut out = String::new();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(log) => out.push_str(&log.to_string()),
                Err(bollard::errors::Error::DockerResponseServerError { status_code: 404, .. }) => {
                    return Err(EngineError::ContainerNotFound(container_id.to_string()));
                }
                Err(e) => return Err(EngineError::Bollard(e)),
            }
        }
        Ok(out)
    }

    async fn create_volume(&self, name: &str) -> Result<(), EngineError> {
        let options = CreateVolumeOptions {
            name: name.to_string(),
            ..Default::default()
        };
        self.client.create_volume(options).await?;
        Ok(())
    }

    async fn remove_volume(&self, name: &str, force: bool) -> Result<(), EngineError> {
        let options = Some(RemoveVolumeOptions { force });
        self.client.remove_volume(name, options).await?;
        Ok(())
    }

    async fn create_network(&self, name: &str) -> Result<String, EngineError> {
        use bollard::query_parameters::CreateNetworkOptions;

        let options = CreateNetworkOptions {
            name: name.to_string(),
            driver: "bridge".to_string(),
            ..Default::default()
        };
        let response = self.client.create_network(options).await?;
        Ok(response.id)
    }

    async fn remove_network(&self, network_id: &str) -> Result<(), EngineError> {
        match self.client.remove_network(network_id).await {
            Ok(()) => Ok(()),
            Err(bollard::errors::Error::DockerResponseServerError { status_code: 404, .. }) => Ok(()),
            Err(e) => Err(EngineError::Bollard(e)),
        }
    }

    async fn pull_image(&self, image: &str) -> Result<(), EngineError> {
        use bollard::query_parameters::CreateImageOptions;
        use futures_util::stream::StreamExt;

        let options = Some(CreateImageOptions {
            from_image: Some(image.to_string()),
            ..Default::default()
        });
        let mut stream = self.client.create_image(options, None, None);
        while let Some(result) = stream.next().await {
            result?;
        }
        Ok(())
    }
}
