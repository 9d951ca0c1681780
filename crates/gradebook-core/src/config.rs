//! Data directory configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::GradebookError;
use crate::store::RecordStore;

/// Environment variable overriding [`GradebookConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "GRADEBOOK_DATA_DIR";

/// Top-level gradebook configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradebookConfig {
    /// Root under which the three data directories live.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Student record files, relative to `data_dir`.
    #[serde(default = "default_records_dir")]
    pub records_dir: PathBuf,
    #[serde(default = "default_marksheets_dir")]
    pub marksheets_dir: PathBuf,
    #[serde(default = "default_transcripts_dir")]
    pub transcripts_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_records_dir() -> PathBuf {
    PathBuf::from("student_records")
}
fn default_marksheets_dir() -> PathBuf {
    PathBuf::from("marksheets")
}
fn default_transcripts_dir() -> PathBuf {
    PathBuf::from("transcripts")
}

impl Default for GradebookConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            records_dir: default_records_dir(),
            marksheets_dir: default_marksheets_dir(),
            transcripts_dir: default_transcripts_dir(),
        }
    }
}

impl GradebookConfig {
    /// Resolve the configured directories against `data_dir`.
    pub fn layout(&self) -> DataLayout {
        DataLayout {
            records: self.data_dir.join(&self.records_dir),
            marksheets: self.data_dir.join(&self.marksheets_dir),
            transcripts: self.data_dir.join(&self.transcripts_dir),
        }
    }
}

/// Resolved locations of the record, marksheet and transcript directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    pub records: PathBuf,
    pub marksheets: PathBuf,
    pub transcripts: PathBuf,
}

impl DataLayout {
    /// Create any missing directory.
    ///
    /// Failures are logged and returned, not raised; later file operations
    /// against a missing directory fail on their own.
    pub fn ensure_directories(&self) -> Vec<GradebookError> {
        let mut failures = Vec::new();
        for dir in [&self.records, &self.marksheets, &self.transcripts] {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::warn!("failed to create {}: {}", dir.display(), e);
                failures.push(GradebookError::storage(dir, e));
            }
        }
        failures
    }

    pub fn record_store(&self) -> RecordStore {
        RecordStore::new(&self.records)
    }
}

/// Load config from an explicit path, or search the well-known paths:
/// 1. `gradebook.toml` in the current directory
/// 2. `~/.config/gradebook/config.toml`
///
/// `GRADEBOOK_DATA_DIR` overrides the configured data directory.
pub fn load_config_from(path: Option<&Path>) -> Result<GradebookConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gradebook.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => GradebookConfig::default(),
    };

    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        config.data_dir = PathBuf::from(dir);
    }

    Ok(config)
}

/// Parse a TOML configuration document.
pub fn parse_config(content: &str) -> Result<GradebookConfig> {
    Ok(toml::from_str(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gradebook"))
}
