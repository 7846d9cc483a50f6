//! Workbook configuration
//!
//! Loaded from a TOML file; every key is optional and a missing file means
//! all defaults.
//!
//! ```toml
//! data_dir = ".workbook"
//! slot = "workbook"
//! ids = "ulid"          # or "uuid"
//! log_level = "info"
//! pretty_export = true
//! ```

use crate::error::ConfigError;
use crate::store::FileStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use workbook_model::IdStrategy;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "workbook.toml";

/// Workbook configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkbookConfig {
    /// Directory holding the persisted slot and default exports
    pub data_dir: PathBuf,
    /// Slot name; the document lives in `<data_dir>/<slot>.json`
    pub slot: String,
    /// Identity generator
    pub ids: IdStrategy,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Indent exported snapshots
    pub pretty_export: bool,
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".workbook"),
            slot: "workbook".to_string(),
            ids: IdStrategy::Ulid,
            log_level: "info".to_string(),
            pretty_export: true,
        }
    }
}

impl WorkbookConfig {
    /// Load from `path`; an absent file yields the defaults
    ///
    /// # Errors
    /// [`ConfigError::Io`] when the file exists but cannot be read,
    /// [`ConfigError::Parse`] when it is not valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text).map_err(|e| ConfigError::parse(path, e)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns the TOML error for invalid syntax or unknown keys.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Override the data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// File store for the configured slot
    #[must_use]
    pub fn file_store(&self) -> FileStore {
        FileStore::new(&self.data_dir, &self.slot)
    }
}
