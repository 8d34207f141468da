//! Flat-file JSON persistence. Each store is one file rewritten wholesale,
//! guarded by a per-file async mutex so concurrent handlers cannot interleave
//! a read-modify-write. Missing or malformed content reads as empty.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::error::AppResult;

/// A single JSON document (or array) on disk.
#[derive(Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Reads the file as a JSON array. A missing or malformed file is an
    /// empty collection, never an error.
    pub async fn read_array<T: DeserializeOwned>(&self) -> Vec<T> {
        let _guard = self.lock.lock().await;
        self.read_array_unlocked().await
    }

    /// Appends one element to the stored array.
    pub async fn append<T: Serialize>(&self, item: &T) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut items: Vec<serde_json::Value> = self.read_array_unlocked().await;
        items.push(serde_json::to_value(item)?);
        self.write_unlocked(&items).await
    }

    /// Reads the file as a single document; `None` when missing or malformed.
    pub async fn read_document<T: DeserializeOwned>(&self) -> Option<T> {
        let _guard = self.lock.lock().await;
        let bytes = tokio::fs::read(&self.path).await.ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::debug!(
                    path = %self.path.display(),
                    error = %e,
                    "malformed document, treating as absent"
                );
                None
            }
        }
    }

    /// Replaces the stored document wholesale. Last write wins.
    pub async fn replace_document<T: Serialize>(&self, doc: &T) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        self.write_unlocked(doc).await
    }

    async fn read_array_unlocked<T: DeserializeOwned>(&self) -> Vec<T> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::debug!(
                    path = %self.path.display(),
                    error = %e,
                    "malformed array, treating as empty"
                );
                Vec::new()
            }),
            Err(_) => Vec::new(),
        }
    }

    async fn write_unlocked<T: Serialize>(&self, value: &T) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

/// The three stores backing the service.
#[derive(Clone)]
pub struct Stores {
    pub reviews: JsonFileStore,
    pub registrations: JsonFileStore,
    pub weekly: JsonFileStore,
}

impl Stores {
    pub fn open(data_dir: &Path) -> Self {
        Self {
            reviews: JsonFileStore::new(data_dir.join("reviews.json")),
            registrations: JsonFileStore::new(data_dir.join("registrations.json")),
            weekly: JsonFileStore::new(data_dir.join("weekly-movie.json")),
        }
    }
}
