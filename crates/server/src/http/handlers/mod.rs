pub mod auth;
pub mod autoscaling;
pub mod caches;
pub mod dashboard;
pub mod databases;
pub mod events;
pub mod functions;
pub mod health;
pub mod instances;
pub mod lb;
pub mod secrets;
pub mod storage;
pub mod volumes;
pub mod vpcs;
