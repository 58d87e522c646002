//! Local filesystem storage backend.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! └── captures.json     # Latest crawl snapshot
//! ```

use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::CaptureSnapshot;

/// Key of the snapshot file inside the storage root.
const SNAPSHOT_KEY: &str = "captures.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Path where the snapshot lands, for operator-facing logs.
    pub fn snapshot_path(&self) -> PathBuf {
        self.path(SNAPSHOT_KEY)
    }

    /// Persist one crawl run's snapshot.
    pub async fn save_snapshot(&self, snapshot: &CaptureSnapshot) -> Result<()> {
        self.write_json(SNAPSHOT_KEY, snapshot).await?;
        log::info!(
            "snapshot of {} page(s) written to {}",
            snapshot.count,
            self.snapshot_path().display()
        );
        Ok(())
    }

    /// Load the last crawl snapshot, if any.
    pub async fn load_snapshot(&self) -> Result<Option<CaptureSnapshot>> {
        self.read_json(SNAPSHOT_KEY).await
    }
}
