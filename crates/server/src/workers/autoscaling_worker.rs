//! Auto-scaling reconciliation: reconcile current↔desired membership, then
//! evaluate CPU policies, then reconcile again against any policy-driven
//! change — grounded on `internal/core/services/autoscaling.go`'s group
//! shape, with the reconciliation-then-policy ordering and cooldown/margin
//! semantics from the specification itself (the Go original has no worker
//! file in this pack to draw the tick loop from). Ticker/shutdown plumbing
//! follows `workers::lb_worker`/`AgentRegistry::start_health_monitoring`.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::db::Repos;
use crate::domain::{Event, ScalingGroup, ScalingPolicy};
use crate::error::ApiResult;
use crate::metrics::Metrics;
use crate::services::instance::{parse_ports, VolumeMount};
use crate::services::{InstanceService, LbService};

const EVAL_INTERVAL: Duration = Duration::from_secs(30);
const METRIC_WINDOW_SECS: i64 = 60;
const SCALE_OUT_THRESHOLD: f64 = 5.0;
const SCALE_IN_THRESHOLD: f64 = 5.0;
const DEFAULT_TARGET_PORT: i32 = 80;

pub struct AutoscalingWorker {
    repos: Repos,
    instances: Arc<InstanceService>,
    lb: Arc<LbService>,
    metrics: Arc<Metrics>,
    clock: Arc<dyn Clock>,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl AutoscalingWorker {
    pub fn new(
        repos: Repos,
        instances: Arc<InstanceService>,
        lb: Arc<LbService>,
        metrics: Arc<Metrics>,
        clock: Arc<dyn Clock>,
        shutdown_rx: tokio::sync::watch::Receiver<bool>,
    ) -> Self {
        Self {
            repos,
            instances,
            lb,
            metrics,
            clock,
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        info!("auto-scaling worker started");
        let mut interval = time::interval(EVAL_INTERVAL);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => self.tick().await,
                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("auto-scaling worker stopping");
                        break;
                    }
                }
            }
        }
    }

    /// Exposed for tests: drives one evaluation cycle without waiting on the
    /// ticker, using whatever `Clock` was injected.
    pub async fn tick(&self) {
        self.metrics.autoscaling_evaluations.inc();

        let active = match self.repos.scaling.list_active_groups().await {
            Ok(groups) => groups,
            Err(e) => {
                warn!(error = %e, "worker: failed to list active scaling groups");
                return;
            }
        };
        for mut group in active {
            if let Err(e) = self.process_active_group(&mut group).await {
                warn!(error = %e, group_id = %group.id, "worker: failed to reconcile scaling group");
            }
        }

        let deleting = match self.repos.scaling.list_deleting_groups().await {
            Ok(groups) => groups,
            Err(e) => {
                warn!(error = %e, "worker: failed to list deleting scaling groups");
                return;
            }
        };
        for group in deleting {
            self.process_deleting_group(&group).await;
        }
    }

    async fn process_active_group(&self, group: &mut ScalingGroup) -> ApiResult<()> {
        self.converge(group, group.desired_count).await?;

        if let Some(new_desired) = self.evaluate_policies(group).await? {
            group.desired_count = new_desired;
            self.repos.scaling.update_group(group).await?;
            self.converge(group, new_desired).await?;
        }

        self.metrics
            .autoscaling_current_instances
            .with_label_values(&[&group.id.to_string()])
            .set(group.current_count as f64);
        Ok(())
    }

    /// Evaluates CPU policies in creation order, firing at most one. Returns
    /// `Some(new_desired)` when a policy changed the desired count.
    async fn evaluate_policies(&self, group: &ScalingGroup) -> ApiResult<Option<i32>> {
        let members = self.repos.scaling.list_members(group.id).await?;
        let avg_cpu = self
            .repos
            .metric_samples
            .average_cpu(&members, METRIC_WINDOW_SECS)
            .await?;
        let Some(avg_cpu) = avg_cpu else { return Ok(None) };

        let policies = self.repos.scaling.list_policies(group.id).await?;
        let now = self.clock.now();

        for policy in policies.into_iter().filter(|p| p.metric_type == "cpu") {
            if let Some(last) = policy.last_scaled_at {
                if (now - last).num_seconds() < i64::from(policy.cooldown_sec) {
                    continue;
                }
            }

            let (new_desired, scaled_out) = if avg_cpu > policy.target_value + SCALE_OUT_THRESHOLD {
                (
                    (group.current_count + policy.scale_out_step).min(group.max_instances),
                    true,
                )
            } else if avg_cpu < policy.target_value - SCALE_IN_THRESHOLD && group.current_count > group.min_instances {
                (
                    (group.current_count - policy.scale_in_step).max(group.min_instances),
                    false,
                )
            } else {
                continue;
            };

            if new_desired == group.desired_count {
                continue;
            }

            self.mark_policy_fired(&policy, now).await?;
            if scaled_out {
                self.metrics.autoscaling_scale_out_events.inc();
                self.append_event(
                    "autoscaling.scale_out",
                    group.id,
                    json!({ "group": group.name, "desired": new_desired, "avg_cpu": avg_cpu }),
                )
                .await;
            } else {
                self.metrics.autoscaling_scale_in_events.inc();
                self.append_event(
                    "autoscaling.scale_in",
                    group.id,
                    json!({ "group": group.name, "desired": new_desired, "avg_cpu": avg_cpu }),
                )
                .await;
            }
            return Ok(Some(new_desired));
        }
        Ok(None)
    }

    async fn mark_policy_fired(&self, policy: &ScalingPolicy, now: chrono::DateTime<chrono::Utc>) -> ApiResult<()> {
        let mut policy = policy.clone();
        policy.last_scaled_at = Some(now);
        self.repos.scaling.update_policy(&policy).await
    }

    /// Launches or terminates members until `current_count` matches `target`.
    async fn converge(&self, group: &mut ScalingGroup, target: i32) -> ApiResult<()> {
        match group.current_count.cmp(&target) {
            Ordering::Less => {
                let to_launch = target - group.current_count;
                for _ in 0..to_launch {
                    self.launch_member(group).await;
                }
            }
            Ordering::Greater => {
                let to_terminate = group.current_count - target;
                self.terminate_youngest(group, to_terminate).await;
            }
            Ordering::Equal => return Ok(()),
        }
        self.repos.scaling.update_group(group).await
    }

    async fn launch_member(&self, group: &mut ScalingGroup) {
        let name = format!("{}-{}", group.name, &Uuid::new_v4().to_string()[..8]);
        match self
            .instances
            .launch(group.user_id, &name, &group.image, &group.ports, Some(group.vpc_id), Vec::<VolumeMount>::new())
            .await
        {
            Ok(instance) => {
                if let Err(e) = self.repos.scaling.add_member(group.id, instance.id).await {
                    warn!(error = %e, group_id = %group.id, "worker: failed to register scaling group member");
                    return;
                }
                if let Some(lb_id) = group.load_balancer_id {
                    let port = target_port(&group.ports);
                    if let Err(e) = self.lb.add_target(lb_id, instance.id, port, 1).await {
                        warn!(error = %e, group_id = %group.id, instance_id = %instance.id, "worker: failed to register LB target");
                    }
                }
                group.current_count += 1;
                debug!(group_id = %group.id, instance_id = %instance.id, "worker: launched scaling group member");
            }
            Err(e) => {
                // Launch failure leaves current_count unchanged; the instance
                // row (if any) is left in ERROR and retried next tick. The
                // cooldown that triggered this launch is not reset.
                warn!(error = %e, group_id = %group.id, "worker: failed to launch scaling group member, retrying next tick");
            }
        }
    }

    async fn terminate_youngest(&self, group: &mut ScalingGroup, count: i32) {
        let member_ids = match self.repos.scaling.list_members(group.id).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, group_id = %group.id, "worker: failed to list scaling group members");
                return;
            }
        };

        let mut members = Vec::new();
        for id in member_ids {
            match self.repos.instances.get_by_id(id).await {
                Ok(instance) => members.push(instance),
                Err(_) => {
                    // Row already gone — drop the stale membership link.
                    let _ = self.repos.scaling.remove_member(group.id, id).await;
                }
            }
        }
        members.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        for instance in members.into_iter().take(count as usize) {
            if let Some(lb_id) = group.load_balancer_id {
                let _ = self.lb.remove_target(lb_id, instance.id).await;
            }
            // Terminating an already-gone container is treated as success by
            // InstanceService::terminate (it swallows engine errors).
            if let Err(e) = self.instances.terminate(&instance.id.to_string(), group.user_id).await {
                warn!(error = %e, instance_id = %instance.id, "worker: failed to terminate scaling group member");
                continue;
            }
            let _ = self.repos.scaling.remove_member(group.id, instance.id).await;
            group.current_count -= 1;
        }
    }

    async fn process_deleting_group(&self, group: &ScalingGroup) {
        let member_ids = self.repos.scaling.list_members(group.id).await.unwrap_or_default();
        for instance_id in member_ids {
            if let Some(lb_id) = group.load_balancer_id {
                let _ = self.lb.remove_target(lb_id, instance_id).await;
            }
            let _ = self.instances.terminate(&instance_id.to_string(), group.user_id).await;
            let _ = self.repos.scaling.remove_member(group.id, instance_id).await;
        }
        if let Err(e) = self.repos.scaling.delete_group(group.id).await {
            warn!(error = %e, group_id = %group.id, "worker: failed to delete scaling group row");
        } else {
            info!(group_id = %group.id, "worker: scaling group fully removed");
        }
    }

    async fn append_event(&self, event_type: &str, resource_id: Uuid, metadata: serde_json::Value) {
        let event = Event::new(event_type, resource_id, "scaling_group", metadata);
        if let Err(e) = self.repos.events.append(&event).await {
            warn!(error = %e, event_type, "worker: failed to append event");
        }
    }
}

/// Target port for a newly-registered LB target: the container side of the
/// group's first port mapping, falling back to 80 if `ports` is empty or
/// unparseable (groups aren't required to expose a port mapping).
fn target_port(ports: &str) -> i32 {
    parse_ports(ports)
        .ok()
        .and_then(|bindings| bindings.first().map(|b| i32::from(b.container_port)))
        .unwrap_or(DEFAULT_TARGET_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use crate::db::fake::test_repos;
    use crate::domain::{MetricSample, ScalingGroupStatus, Vpc};
    use crate::engine::FakeEngine;

    fn new_worker(repos: Repos, clock: Arc<FakeClock>) -> AutoscalingWorker {
        let engine: Arc<dyn crate::engine::ContainerEngine> = Arc::new(FakeEngine::new());
        let instances = Arc::new(InstanceService::new(repos.clone(), engine));
        let lb = Arc::new(LbService::new(repos.clone()));
        let metrics = Arc::new(Metrics::new());
        let (_tx, rx) = tokio::sync::watch::channel(false);
        AutoscalingWorker::new(repos, instances, lb, metrics, clock, rx)
    }

    async fn seed_group_with_policy(
        repos: &Repos,
        cooldown_sec: i32,
    ) -> (Uuid, Uuid) {
        let user_id = Uuid::new_v4();
        let vpc = Vpc {
            id: Uuid::new_v4(),
            user_id,
            name: "vpc-a".into(),
            network_id: "net-a".into(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        repos.vpcs.create(&vpc).await.unwrap();

        let now = chrono::Utc::now();
        let group = ScalingGroup {
            id: Uuid::new_v4(),
            user_id,
            name: "web".into(),
            vpc_id: vpc.id,
            load_balancer_id: None,
            image: "nginx".into(),
            ports: String::new(),
            min_instances: 1,
            max_instances: 5,
            desired_count: 1,
            current_count: 1,
            status: ScalingGroupStatus::Active,
            idempotency_key: None,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        repos.scaling.create_group(&group).await.unwrap();

        let member = crate::domain::Instance {
            id: Uuid::new_v4(),
            user_id,
            name: "web-seed".into(),
            image: "nginx".into(),
            status: crate::domain::InstanceStatus::Running,
            ports: String::new(),
            container_id: Some("fake-container-seed".into()),
            vpc_id: Some(vpc.id),
            version: 1,
            created_at: now,
            updated_at: now,
        };
        repos.instances.create(&member).await.unwrap();
        repos.scaling.add_member(group.id, member.id).await.unwrap();

        let policy = ScalingPolicy {
            id: Uuid::new_v4(),
            scaling_group_id: group.id,
            name: "cpu-scale".into(),
            metric_type: "cpu".into(),
            target_value: 50.0,
            scale_out_step: 1,
            scale_in_step: 1,
            cooldown_sec,
            last_scaled_at: None,
            created_at: now,
        };
        repos.scaling.create_policy(&policy).await.unwrap();

        (group.id, member.id)
    }

    #[tokio::test]
    async fn scales_out_when_cpu_exceeds_target() {
        let repos = test_repos();
        let (group_id, member_id) = seed_group_with_policy(&repos, 60).await;
        repos
            .metric_samples
            .record(&MetricSample {
                instance_id: member_id,
                cpu_percent: 90.0,
                memory_bytes: 0,
                recorded_at: chrono::Utc::now(),
            })
            .await
            .unwrap();

        let clock = Arc::new(FakeClock::new(chrono::Utc::now()));
        let worker = new_worker(repos.clone(), clock);
        worker.tick().await;

        let group = repos.scaling.get_group_by_id(group_id).await.unwrap();
        assert_eq!(group.desired_count, 2);
        assert_eq!(group.current_count, 2);
    }

    #[tokio::test]
    async fn cooldown_blocks_a_second_scale_out() {
        let repos = test_repos();
        let (group_id, member_id) = seed_group_with_policy(&repos, 120).await;
        repos
            .metric_samples
            .record(&MetricSample {
                instance_id: member_id,
                cpu_percent: 90.0,
                memory_bytes: 0,
                recorded_at: chrono::Utc::now(),
            })
            .await
            .unwrap();

        let clock = Arc::new(FakeClock::new(chrono::Utc::now()));
        let worker = new_worker(repos.clone(), clock.clone());

        worker.tick().await;
        let after_first = repos.scaling.get_group_by_id(group_id).await.unwrap();
        assert_eq!(after_first.desired_count, 2);

        // Still within the cooldown window: a second evaluation must not
        // fire the policy again even though CPU is still over target.
        clock.advance(chrono::Duration::seconds(30));
        worker.tick().await;
        let after_second = repos.scaling.get_group_by_id(group_id).await.unwrap();
        assert_eq!(after_second.desired_count, 2);

        // Past the cooldown window: the policy is free to fire again.
        clock.advance(chrono::Duration::seconds(121));
        worker.tick().await;
        let after_third = repos.scaling.get_group_by_id(group_id).await.unwrap();
        assert_eq!(after_third.desired_count, 3);
    }
}
