//! Load-balancer reconciliation — deploys a reverse-proxy container for
//! `CREATING` LBs and tears down `DELETED` ones. Grounded on
//! `internal/core/services/lb_worker.go`; ticker/shutdown plumbing follows
//! the teacher's `AgentRegistry::start_health_monitoring`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tracing::{debug, info, warn};

use crate::db::Repos;
use crate::domain::{LbStatus, LbTarget};
use crate::engine::{ContainerEngine, ContainerSpec};

const TICK_INTERVAL: Duration = Duration::from_secs(5);

pub struct LbWorker {
    repos: Repos,
    engine: Arc<dyn ContainerEngine>,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl LbWorker {
    pub fn new(
        repos: Repos,
        engine: Arc<dyn ContainerEngine>,
        shutdown_rx: tokio::sync::watch::Receiver<bool>,
    ) -> Self {
        Self {
            repos,
            engine,
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        info!("load balancer worker started");
        let mut interval = time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.process_creating().await;
                    self.process_deleted().await;
                }
                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("load balancer worker stopping");
                        break;
                    }
                }
            }
        }
    }

    async fn process_creating(&self) {
        let lbs = match self.repos.lbs.list_all().await {
            Ok(lbs) => lbs,
            Err(e) => {
                warn!(error = %e, "worker: failed to list load balancers");
                return;
            }
        };
        for lb in lbs.into_iter().filter(|lb| lb.status == LbStatus::Creating) {
            self.deploy(lb).await;
        }
    }

    async fn process_deleted(&self) {
        let lbs = match self.repos.lbs.list_all().await {
            Ok(lbs) => lbs,
            Err(e) => {
                warn!(error = %e, "worker: failed to list load balancers");
                return;
            }
        };
        for lb in lbs.into_iter().filter(|lb| lb.status == LbStatus::Deleted) {
            self.cleanup(lb).await;
        }
    }

    async fn deploy(&self, mut lb: crate::domain::LoadBalancer) {
        debug!(lb_id = %lb.id, "worker: deploying load balancer");
        let targets = match self.repos.lbs.list_targets(lb.id).await {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, lb_id = %lb.id, "worker: failed to list targets");
                return;
            }
        };

        let spec = proxy_spec(&lb, &targets);
        let container_id = match self.engine.run_container(&spec).await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, lb_id = %lb.id, "worker: failed to deploy proxy, retrying next tick");
                return;
            }
        };

        lb.status = LbStatus::Active;
        lb.container_id = Some(container_id);
        if let Err(e) = self.repos.lbs.update(&mut lb).await {
            warn!(error = %e, lb_id = %lb.id, "worker: failed to mark load balancer active");
        } else {
            info!(lb_id = %lb.id, "worker: load balancer is now ACTIVE");
        }
    }

    async fn cleanup(&self, lb: crate::domain::LoadBalancer) {
        debug!(lb_id = %lb.id, "worker: cleaning up load balancer");
        if let Some(container_id) = &lb.container_id {
            // Tolerate not-found: the proxy may already be gone.
            let _ = self.engine.remove_container(container_id, true).await;
        }
        if let Err(e) = self.repos.lbs.delete(lb.id).await {
            warn!(error = %e, lb_id = %lb.id, "worker: failed to delete load balancer row");
        } else {
            info!(lb_id = %lb.id, "worker: load balancer fully removed");
        }
    }
}

/// Generates the reverse-proxy container spec. Only `round-robin` maps
/// targets in declaration order with equal share; `least-conn`/`ip-hash`
/// are accepted at the API but fall back to round-robin here — the
/// original's proxy generator for those algorithms isn't specified.
/// TODO: implement least-conn and ip-hash once a concrete proxy config
/// format (e.g. nginx upstream weights) is chosen.
fn proxy_spec(lb: &crate::domain::LoadBalancer, targets: &[LbTarget]) -> ContainerSpec {
    let upstream = targets
        .iter()
        .enumerate()
        .map(|(i, t)| format!("server-{i}:{}:{}", t.instance_id, t.port))
        .collect::<Vec<_>>()
        .join(",");

    let mut env = HashMap::new();
    env.insert("LB_ALGORITHM".to_string(), lb.algorithm.as_str().to_string());
    env.insert("LB_UPSTREAM".to_string(), upstream);
    env.insert("LB_LISTEN_PORT".to_string(), lb.port.to_string());

    ContainerSpec {
        image: "thecloud/reverse-proxy:latest".to_string(),
        name: format!("thecloud-lb-{}", &lb.id.to_string()[..8]),
        ports: vec![(lb.port as u16, lb.port as u16)],
        env,
        volume_binds: Vec::new(),
        network: Some(lb.vpc_id.to_string()),
    }
}
