//! Configuration for ingestion, queries, and storage.
//!
//! Load order: `.reason/config.toml` → environment variables → defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level reason configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonConfig {
    pub ingest: IngestConfig,
    pub query: QueryConfig,
    pub storage: StorageConfig,
}

/// Ingestion pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Skip unreadable files instead of aborting the whole run.
    /// When false (default), one unreadable file fails the batch and
    /// nothing from that run is persisted.
    pub skip_unreadable: bool,
}

/// Query configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Maximum number of nodes returned by a query.
    pub result_limit: usize,
    /// Maximum number of files returned by a run-file listing.
    pub file_list_limit: usize,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Compress index.json with zstd before writing.
    /// Decompression on load is automatic (detected by magic bytes).
    pub compress: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            result_limit: 50,
            file_list_limit: 200,
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl ReasonConfig {
    /// Load config from `.reason/config.toml` in the project root, with env
    /// var overrides. Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".reason").join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        // Environment variable overrides
        env_override("REASON_RESULT_LIMIT", &mut config.query.result_limit);
        env_override("REASON_FILE_LIST_LIMIT", &mut config.query.file_list_limit);
        env_override("REASON_SKIP_UNREADABLE", &mut config.ingest.skip_unreadable);
        env_override("REASON_COMPRESS_INDEX", &mut config.storage.compress);

        if config.query.result_limit == 0 {
            anyhow::bail!("query.result_limit must be greater than zero");
        }

        Ok(config)
    }
}
