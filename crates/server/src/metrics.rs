//! Prometheus metrics registry, grounded on `internal/platform/metrics.go`
//! and named with the original's `mini_aws_` prefix kept as `thecloud_` so
//! the series rename doesn't collide with the Go original if both run
//! side by side during a migration.

use prometheus::{Counter, Gauge, GaugeVec, Opts, Registry};

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,
    pub ws_connections_active: Gauge,
    pub autoscaling_evaluations: Counter,
    pub autoscaling_scale_out_events: Counter,
    pub autoscaling_scale_in_events: Counter,
    pub autoscaling_current_instances: GaugeVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let ws_connections_active = Gauge::with_opts(Opts::new(
            "thecloud_ws_connections_active",
            "The total number of active dashboard stream connections",
        ))
        .expect("valid metric opts");

        let autoscaling_evaluations = Counter::with_opts(Opts::new(
            "thecloud_autoscaling_evaluations_total",
            "Total number of auto-scaling evaluation cycles",
        ))
        .expect("valid metric opts");

        let autoscaling_scale_out_events = Counter::with_opts(Opts::new(
            "thecloud_autoscaling_scale_out_total",
            "Total number of scale-out events",
        ))
        .expect("valid metric opts");

        let autoscaling_scale_in_events = Counter::with_opts(Opts::new(
            "thecloud_autoscaling_scale_in_total",
            "Total number of scale-in events",
        ))
        .expect("valid metric opts");

        let autoscaling_current_instances = GaugeVec::new(
            Opts::new(
                "thecloud_autoscaling_current_instances",
                "Current instance count per scaling group",
            ),
            &["scaling_group_id"],
        )
        .expect("valid metric opts");

        registry
            .register(Box::new(ws_connections_active.clone()))
            .expect("metric registration");
        registry
            .register(Box::new(autoscaling_evaluations.clone()))
            .expect("metric registration");
        registry
            .register(Box::new(autoscaling_scale_out_events.clone()))
            .expect("metric registration");
        registry
            .register(Box::new(autoscaling_scale_in_events.clone()))
            .expect("metric registration");
        registry
            .register(Box::new(autoscaling_current_instances.clone()))
            .expect("metric registration");

        Self {
            registry,
            ws_connections_active,
            autoscaling_evaluations,
            autoscaling_scale_out_events,
            autoscaling_scale_in_events,
            autoscaling_current_instances,
        }
    }

    pub fn render(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder
            .encode(&metric_families, &mut buf)
            .expect("metrics encode to valid utf8");
        String::from_utf8(buf).expect("prometheus text format is utf8")
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
