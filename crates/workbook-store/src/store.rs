//! Single-slot document storage
//!
//! A store holds exactly one serialized document and overwrites it
//! wholesale on every save.

use crate::error::StoreError;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Durable slot for the serialized working document
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    /// Read the slot, `None` when nothing was ever saved
    async fn load(&self) -> Result<Option<String>, StoreError>;

    /// Overwrite the slot
    async fn save(&self, contents: String) -> Result<(), StoreError>;
}

/// Store backed by one JSON file
///
/// Saves write a sibling temp file and rename it over the slot, so a crash
/// mid-write leaves the previous contents in place.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Slot `<dir>/<slot>.json`
    #[inline]
    #[must_use]
    pub fn new(dir: impl AsRef<Path>, slot: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{slot}.json")),
        }
    }

    /// Path of the slot file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl DocumentStore for FileStore {
    async fn load(&self) -> Result<Option<String>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::io_error(&self.path, err)),
        };
        match String::from_utf8(bytes) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "slot is not UTF-8, treating as empty"
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, contents: String) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::io_error(dir, e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, contents)
            .await
            .map_err(|e| StoreError::io_error(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StoreError::io_error(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), "saved document");
        Ok(())
    }
}

/// In-process store; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    current: Option<String>,
    saves: usize,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store whose slot already holds `contents`
    #[must_use]
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let store = Self::new();
        store.inner.lock().current = Some(contents.into());
        store
    }

    /// Current slot contents
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.inner.lock().current.clone()
    }

    /// Number of completed saves
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.inner.lock().saves
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.contents())
    }

    async fn save(&self, contents: String) -> Result<(), StoreError> {
        let mut slot = self.inner.lock();
        slot.current = Some(contents);
        slot.saves += 1;
        Ok(())
    }
}
