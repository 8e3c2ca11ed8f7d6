//! Local CLI config persistence, mirroring `cmd/cloud-cli/auth.go`'s
//! `saveConfig`/`loadConfig` pair — a single JSON file under the user's
//! home directory holding the last-saved API key.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredConfig {
    api_key: Option<String>,
}

fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".thecloud").join("config.json"))
}

pub fn save_api_key(key: &str) -> Result<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let cfg = StoredConfig {
        api_key: Some(key.to_string()),
    };
    fs::write(&path, serde_json::to_vec_pretty(&cfg)?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

pub fn load_api_key() -> Option<String> {
    let path = config_path().ok()?;
    let data = fs::read(path).ok()?;
    let cfg: StoredConfig = serde_json::from_slice(&data).ok()?;
    cfg.api_key
}
