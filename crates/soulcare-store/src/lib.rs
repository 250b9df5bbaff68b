//! Append-only JSON store for submitted complaints.
//!
//! The whole list lives in a single pretty-printed JSON array. Reads are
//! forgiving (missing or corrupt files read as empty). Writes refuse to replace
//! a file that cannot be parsed, and swap the file atomically via a sibling
//! temp file and `rename`.

use std::path::{Path, PathBuf};

use soulcare_core::Complaint;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("complaint store {path} I/O failed: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize complaints: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("complaint store {path} is not a valid complaint list: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed complaint store.
///
/// Appends are serialized through an internal mutex so concurrent requests
/// never interleave a read-modify-write cycle.
#[derive(Debug)]
pub struct ComplaintStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ComplaintStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every stored complaint in insertion order.
    ///
    /// A missing file yields an empty list. An unreadable or corrupt file is
    /// logged and also yields an empty list.
    pub async fn load(&self) -> Vec<Complaint> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "complaint store unreadable; treating as empty"
                );
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(complaints) => complaints,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "complaint store is not valid JSON; treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Complaints sorted by `created_at`, newest first.
    pub async fn list_recent(&self) -> Vec<Complaint> {
        let mut complaints = self.load().await;
        complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        complaints
    }

    /// Append one complaint and persist the full list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the existing file cannot be parsed,
    /// leaving it untouched, or another [`StoreError`] if the list cannot be
    /// read, serialized or written.
    pub async fn append(&self, complaint: Complaint) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut complaints = self.load_strict().await?;
        complaints.push(complaint);
        self.save(&complaints).await?;

        tracing::debug!(
            path = %self.path.display(),
            total = complaints.len(),
            "complaint appended"
        );
        Ok(())
    }

    /// Load for the write path: only a missing file reads as empty.
    async fn load_strict(&self) -> Result<Vec<Complaint>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }

    async fn save(&self, complaints: &[Complaint]) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(complaints)?;
        let tmp_path = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, body)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn complaint(id: i64, hour: u32, description: &str) -> Complaint {
        Complaint {
            id,
            name: format!("autor-{id}"),
            email: format!("autor{id}@example.com"),
            description: description.to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ComplaintStore::new(dir.path().join("complaints.json"));
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn load_corrupt_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("complaints.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = ComplaintStore::new(&path);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn append_preserves_insertion_order_and_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("complaints.json");
        let store = ComplaintStore::new(&path);

        store.append(complaint(1, 10, "péssimo 😡")).await.unwrap();
        store.append(complaint(2, 9, "ok")).await.unwrap();

        let loaded = store.load().await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, 1);
        assert_eq!(loaded[1].id, 2);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("péssimo 😡"), "non-ASCII should be written as-is");
        assert!(!dir.path().join("complaints.json.tmp").exists());
    }

    #[tokio::test]
    async fn list_recent_sorts_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = ComplaintStore::new(dir.path().join("complaints.json"));

        store.append(complaint(1, 8, "a")).await.unwrap();
        store.append(complaint(2, 12, "b")).await.unwrap();
        store.append(complaint(3, 10, "c")).await.unwrap();

        let ids: Vec<i64> = store.list_recent().await.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn append_refuses_to_overwrite_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("complaints.json");
        std::fs::write(&path, "[{\"id\": 1, truncated").unwrap();
        let store = ComplaintStore::new(&path);

        let err = store.append(complaint(2, 1, "novo")).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }), "got: {err:?}");
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[{\"id\": 1, truncated"
        );
        assert!(!dir.path().join("complaints.json.tmp").exists());
    }

    #[tokio::test]
    async fn append_to_unwritable_location_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = ComplaintStore::new(dir.path().join("missing-dir").join("complaints.json"));
        let err = store.append(complaint(1, 1, "x")).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }), "got: {err:?}");
    }
}
