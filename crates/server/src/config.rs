//! Environment-driven configuration, loaded the way the teacher's
//! `ClusterConfig::load` layers file/env sources — here flattened to the
//! handful of scalar env vars spec.md names, with `.env` support via
//! `dotenvy` and compile-time defaults as the fallback layer.

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct ThecloudConfig {
    pub database_url: String,
    pub port: u16,
    pub environment: Environment,
    pub encryption_secret: String,
    pub max_instances_hard_limit: u32,
    pub max_scaling_groups_per_vpc: u32,
    pub min_cooldown_seconds: u32,
    pub docker_socket: String,
    pub storage_root: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl ThecloudConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set")?;
        let port = env_or("PORT", 8080)?;
        let environment = match std::env::var("ENVIRONMENT").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };
        let encryption_secret = std::env::var("THECLOUD_ENCRYPTION_SECRET")
            .unwrap_or_else(|_| "development-only-insecure-secret".to_string());
        let max_instances_hard_limit = env_or("MAX_INSTANCES_HARD_LIMIT", 100)?;
        let max_scaling_groups_per_vpc = env_or("MAX_SCALING_GROUPS_PER_VPC", 10)?;
        let min_cooldown_seconds = env_or("MIN_COOLDOWN_SECONDS", 60)?;
        let docker_socket = std::env::var("DOCKER_SOCKET").unwrap_or_default();
        let storage_root = std::env::var("THECLOUD_STORAGE_ROOT")
            .unwrap_or_else(|_| "./data/objects".to_string());

        if environment.is_production() && encryption_secret == "development-only-insecure-secret" {
            anyhow::bail!("THECLOUD_ENCRYPTION_SECRET must be set in production");
        }

        Ok(Self {
            database_url,
            port,
            environment,
            encryption_secret,
            max_instances_hard_limit,
            max_scaling_groups_per_vpc,
            min_cooldown_seconds,
            docker_socket,
            storage_root,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) => v
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key}: {e}")),
        Err(_) => Ok(default),
    }
}
