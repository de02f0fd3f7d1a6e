//! Stream configuration
//!
//! Tuning knobs for bounded readers. Nothing is read implicitly: callers
//! either use the defaults or load a JSON file with
//! [`StreamConfig::load_from_path`] and pass it along.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Root stream configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Scratch buffer size used when draining a stream into a writer
    #[serde(default = "default_copy_buffer_size")]
    pub copy_buffer_size: usize,
}

fn default_copy_buffer_size() -> usize {
    64 * 1024
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            copy_buffer_size: default_copy_buffer_size(),
        }
    }
}

impl StreamConfig {
    /// Load configuration from a JSON file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: StreamConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Copy buffer size, never zero
    pub fn effective_copy_buffer_size(&self) -> usize {
        self.copy_buffer_size.max(1)
    }
}
