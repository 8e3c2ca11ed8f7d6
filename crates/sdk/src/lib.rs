pub mod auth;
pub mod autoscaling;
pub mod client;
pub mod compute;
pub mod models;
pub mod vpc;

pub use client::{Client, SdkError, SdkResult};
