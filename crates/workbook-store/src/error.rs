//! Error types for persistence, sessions and configuration

use std::path::{Path, PathBuf};
use workbook_merge::MergeError;
use workbook_model::ModelError;

/// Errors raised by stores and the working session
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error on a store slot or an import/export file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document could not be serialized
    #[error("serialization failed: {0}")]
    Serialize(#[from] ModelError),

    /// Imported file was rejected; the local document is unchanged
    #[error("import rejected: {0}")]
    Import(#[from] MergeError),

    /// Background writer is gone
    #[error("persistence task failed: {0}")]
    Task(String),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if error is a rejected import
    #[inline]
    #[must_use]
    pub fn is_rejected_import(&self) -> bool {
        matches!(self, Self::Import(_))
    }
}

/// Errors loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected shape
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub(crate) fn parse(path: &Path, source: toml::de::Error) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            source,
        }
    }
}
