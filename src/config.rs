// src/config.rs
//! Pipeline configuration. Explicit values passed into the pipeline at
//! construction: no global mutable paths, and directory creation is an
//! explicit idempotent setup step (`ensure_dirs`), not a load side effect.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::upload::DEFAULT_BATCH_SIZE;

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/pipeline.toml";

pub const ENV_CONFIG_PATH: &str = "FAX_CONFIG_PATH";
pub const ENV_ENDPOINT_URL: &str = "FAX_ENDPOINT_URL";
pub const ENV_BATCH_SIZE: &str = "FAX_BATCH_SIZE";
pub const ENV_DIRECTION: &str = "FAX_DIRECTION";

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_incoming")]
    pub incoming_dir: PathBuf,
    #[serde(default = "default_processed")]
    pub processed_dir: PathBuf,
    #[serde(default = "default_failed")]
    pub failed_dir: PathBuf,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub endpoint_url: String,
    /// Direction profile name: `sent`, `received` or `received-sweeping`.
    #[serde(default = "default_direction")]
    pub direction: String,
}

fn default_incoming() -> PathBuf {
    PathBuf::from("incoming")
}
fn default_processed() -> PathBuf {
    PathBuf::from("processed")
}
fn default_failed() -> PathBuf {
    PathBuf::from("failed-uploads")
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
fn default_direction() -> String {
    "sent".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            incoming_dir: default_incoming(),
            processed_dir: default_processed(),
            failed_dir: default_failed(),
            batch_size: default_batch_size(),
            endpoint_url: String::new(),
            direction: default_direction(),
        }
    }
}

impl PipelineConfig {
    /// Load from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading pipeline config from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("parsing pipeline config {}", path.display()))
    }

    /// Load using env + fallbacks:
    /// 1) $FAX_CONFIG_PATH
    /// 2) config/pipeline.toml
    /// 3) built-in defaults
    /// then apply per-field env overrides and validate.
    pub fn load() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            Self::load_from(&PathBuf::from(p))?
        } else {
            let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_p.exists() {
                Self::load_from(&default_p)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env_overrides();
        if cfg.endpoint_url.trim().is_empty() {
            bail!("no ingestion endpoint configured (set endpoint_url or {ENV_ENDPOINT_URL})");
        }
        Ok(cfg)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var(ENV_ENDPOINT_URL) {
            if !v.trim().is_empty() {
                self.endpoint_url = v;
            }
        }
        if let Ok(v) = std::env::var(ENV_BATCH_SIZE) {
            if let Ok(n) = v.trim().parse::<usize>() {
                self.batch_size = n.max(1);
            }
        }
        if let Ok(v) = std::env::var(ENV_DIRECTION) {
            if !v.trim().is_empty() {
                self.direction = v;
            }
        }
    }

    /// Create the three lifecycle directories. Safe to call on every run.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.incoming_dir, &self.processed_dir, &self.failed_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating directory {}", dir.display()))?;
        }
        Ok(())
    }
}
