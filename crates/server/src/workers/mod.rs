//! Background reconciliation workers — each an independent `tokio` task
//! driven by its own ticker and a shared shutdown signal, grounded on the
//! teacher's `AgentRegistry::start_health_monitoring`.

pub mod autoscaling_worker;
pub mod lb_worker;

pub use autoscaling_worker::AutoscalingWorker;
pub use lb_worker::LbWorker;
