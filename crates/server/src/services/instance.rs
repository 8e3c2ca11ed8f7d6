//! Instance lifecycle: launch/stop/terminate state machine over the
//! container engine, grounded on the teacher's container lifecycle module
//! (`crates/agent/src/docker/container.rs`) but driven by persisted state
//! instead of direct Docker queries.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::db::Repos;
use crate::domain::{Instance, InstanceStatus, PortBinding, VolumeAttachment};
use crate::engine::{ContainerEngine, ContainerSpec, EngineContainerState};
use crate::error::{ApiError, ApiResult};

const MAX_PORTS_PER_INSTANCE: usize = 16;
const CONTAINER_NAME_PREFIX: &str = "thecloud";

pub struct InstanceService {
    repos: Repos,
    engine: Arc<dyn ContainerEngine>,
}

pub struct VolumeMount {
    pub volume_id: Uuid,
    pub mount_path: String,
}

impl InstanceService {
    pub fn new(repos: Repos, engine: Arc<dyn ContainerEngine>) -> Self {
        Self { repos, engine }
    }

    pub async fn launch(
        &self,
        user_id: Uuid,
        name: &str,
        image: &str,
        ports: &str,
        vpc_id: Option<Uuid>,
        volumes: Vec<VolumeMount>,
    ) -> ApiResult<Instance> {
        let parsed_ports = parse_ports(ports)?;

        let network = if let Some(vpc_id) = vpc_id {
            Some(self.repos.vpcs.get_by_id(vpc_id).await?.network_id)
        } else {
            None
        };

        let now = chrono::Utc::now();
        let mut instance = Instance {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            image: image.to_string(),
            status: InstanceStatus::Starting,
            ports: ports.to_string(),
            container_id: None,
            vpc_id,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.repos.instances.create(&instance).await?;

        for mount in &volumes {
            self.repos
                .instances
                .attach_volume(&VolumeAttachment {
                    instance_id: instance.id,
                    volume_id: mount.volume_id,
                    mount_path: mount.mount_path.clone(),
                })
                .await?;
        }

        let container_name = format!(
            "{CONTAINER_NAME_PREFIX}-{}",
            &instance.id.to_string()[..8]
        );
        let spec = ContainerSpec {
            image: image.to_string(),
            name: container_name,
            ports: parsed_ports
                .iter()
                .map(|p| (p.host_port, p.container_port))
                .collect(),
            env: HashMap::new(),
            volume_binds: volumes
                .iter()
                .map(|v| format!("{}:{}", v.volume_id, v.mount_path))
                .collect(),
            network,
        };

        match self.engine.run_container(&spec).await {
            Ok(container_id) => {
                instance.status = InstanceStatus::Running;
                instance.container_id = Some(container_id);
                self.repos.instances.update(&mut instance).await?;
                self.append_event(
                    "instance.launched",
                    instance.id,
                    "instance",
                    json!({ "name": instance.name, "image": instance.image }),
                )
                .await;
                Ok(instance)
            }
            Err(engine_err) => {
                instance.status = InstanceStatus::Error;
                // Best-effort: if this also fails, the row still shows STARTING
                // and the operator can reconcile manually.
                let _ = self.repos.instances.update(&mut instance).await;
                Err(ApiError::internal(engine_err))
            }
        }
    }

    pub async fn stop(&self, id_or_name: &str, user_id: Uuid) -> ApiResult<Instance> {
        let mut instance = self.resolve(id_or_name, user_id).await?;
        if instance.status == InstanceStatus::Stopped {
            return Ok(instance);
        }

        let container_id = instance
            .container_id
            .clone()
            .unwrap_or_else(|| legacy_container_name(&instance.id));

        self.engine
            .stop_container(&container_id)
            .await
            .map_err(ApiError::internal)?;

        instance.status = InstanceStatus::Stopped;
        self.repos.instances.update(&mut instance).await?;
        Ok(instance)
    }

    pub async fn terminate(&self, id_or_name: &str, user_id: Uuid) -> ApiResult<()> {
        let instance = self.resolve(id_or_name, user_id).await?;

        if let Some(container_id) = &instance.container_id {
            // Swallow engine errors: the container may already be gone.
            let _ = self.engine.remove_container(container_id, true).await;
        }

        self.repos.instances.delete(instance.id).await?;
        self.append_event(
            "instance.terminated",
            instance.id,
            "instance",
            json!({ "name": instance.name }),
        )
        .await;
        Ok(())
    }

    pub async fn get(&self, id_or_name: &str, user_id: Uuid) -> ApiResult<Instance> {
        self.resolve(id_or_name, user_id).await
    }

    pub async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Instance>> {
        self.repos.instances.list(user_id).await
    }

    pub async fn logs(&self, id_or_name: &str, user_id: Uuid, tail_lines: usize) -> ApiResult<String> {
        let instance = self.resolve(id_or_name, user_id).await?;
        let Some(container_id) = instance.container_id else {
            return Err(ApiError::InstanceNotRunning(instance.name));
        };
        self.engine
            .fetch_logs(&container_id, tail_lines)
            .await
            .map_err(ApiError::internal)
    }

    pub async fn engine_state(&self, id_or_name: &str, user_id: Uuid) -> ApiResult<EngineContainerState> {
        let instance = self.resolve(id_or_name, user_id).await?;
        let Some(container_id) = instance.container_id else {
            return Ok(EngineContainerState::Missing);
        };
        self.engine
            .inspect_state(&container_id)
            .await
            .map_err(ApiError::internal)
    }

    async fn resolve(&self, id_or_name: &str, user_id: Uuid) -> ApiResult<Instance> {
        if let Ok(id) = Uuid::parse_str(id_or_name) {
            self.repos.instances.get_by_id(id).await
        } else {
            self.repos.instances.get_by_name(user_id, id_or_name).await
        }
    }

    async fn append_event(
        &self,
        event_type: &str,
        resource_id: Uuid,
        resource_type: &str,
        metadata: serde_json::Value,
    ) {
        let event = crate::domain::Event::new(event_type, resource_id, resource_type, metadata);
        if let Err(e) = self.repos.events.append(&event).await {
            tracing::warn!(error = %e, event_type, "failed to append event");
        }
    }
}

fn legacy_container_name(id: &Uuid) -> String {
    format!("{CONTAINER_NAME_PREFIX}-{}", &id.to_string()[..8])
}

/// Parses `"host:container[,host:container…]"` into validated bindings.
pub fn parse_ports(spec: &str) -> ApiResult<Vec<PortBinding>> {
    if spec.trim().is_empty() {
        return Ok(Vec::new());
    }
    let pairs: Vec<&str> = spec.split(',').collect();
    if pairs.len() > MAX_PORTS_PER_INSTANCE {
        return Err(ApiError::TooManyPorts(format!(
            "at most {MAX_PORTS_PER_INSTANCE} port mappings allowed, got {}",
            pairs.len()
        )));
    }

    let mut bindings = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let (host, container) = pair
            .split_once(':')
            .ok_or_else(|| ApiError::InvalidPortFormat(format!("expected 'host:container', got '{pair}'")))?;
        let host_port: u16 = host
            .trim()
            .parse()
            .map_err(|_| ApiError::InvalidPortFormat(format!("invalid host port '{host}'")))?;
        let container_port: u16 = container
            .trim()
            .parse()
            .map_err(|_| ApiError::InvalidPortFormat(format!("invalid container port '{container}'")))?;
        if host_port == 0 || container_port == 0 {
            return Err(ApiError::InvalidPortFormat(
                "ports must be in range [1, 65535]".into(),
            ));
        }
        bindings.push(PortBinding {
            host_port,
            container_port,
        });
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_port() {
        let bindings = parse_ports("8080:80").unwrap();
        assert_eq!(bindings, vec![PortBinding { host_port: 8080, container_port: 80 }]);
    }

    #[test]
    fn parses_multiple_ports() {
        let bindings = parse_ports("8080:80,8443:443").unwrap();
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn rejects_malformed_pair() {
        assert!(matches!(parse_ports("8080"), Err(ApiError::InvalidPortFormat(_))));
    }

    #[test]
    fn rejects_too_many_ports() {
        let spec = (0..17).map(|i| format!("{}:{}", 10000 + i, i + 1)).collect::<Vec<_>>().join(",");
        assert!(matches!(parse_ports(&spec), Err(ApiError::TooManyPorts(_))));
    }

    #[test]
    fn empty_spec_yields_no_bindings() {
        assert_eq!(parse_ports("").unwrap(), Vec::new());
    }
}
