//! Snapshot storage: trait + file-backed implementation.
//!
//! Snapshots are written as pretty JSON under a date directory and are
//! re-verified against their content hash whenever they are read back.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{LogSnapshot, SnapshotId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Snapshot not found: {0}")]
    NotFound(SnapshotId),

    #[error("Integrity check failed for snapshot {0}: stored hash does not match content")]
    IntegrityViolation(SnapshotId),

    #[error("Snapshot has no content hash")]
    Unhashed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence backend for change-log snapshots.
pub trait LogStore {
    /// Store a hashed snapshot.
    fn save(&self, snapshot: &LogSnapshot) -> Result<(), StoreError>;

    /// Load one snapshot and verify its hash.
    fn get(&self, id: SnapshotId) -> Result<LogSnapshot, StoreError>;

    /// Every intact snapshot, newest first.
    fn list(&self) -> Result<Vec<LogSnapshot>, StoreError>;

    /// The newest intact snapshot, if any.
    fn latest(&self) -> Result<Option<LogSnapshot>, StoreError> {
        Ok(self.list()?.into_iter().next())
    }
}

/// Snapshots on disk at `{root}/{YYYY}/{MM}/{DD}/{snapshot_id}.json`.
pub struct FileLogStore {
    root: PathBuf,
}

impl FileLogStore {
    /// Open a store, creating `root` if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, snapshot: &LogSnapshot) -> PathBuf {
        self.root
            .join(snapshot.taken_at.format("%Y/%m/%d").to_string())
            .join(format!("{}.json", snapshot.id))
    }

    fn files(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut files = Vec::new();
        walk_json(&self.root, &mut files)?;
        Ok(files)
    }
}

impl LogStore for FileLogStore {
    fn save(&self, snapshot: &LogSnapshot) -> Result<(), StoreError> {
        if snapshot.content_hash.is_none() {
            return Err(StoreError::Unhashed);
        }

        let path = self.path_for(snapshot);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, serde_json::to_string_pretty(snapshot)?)?;

        tracing::debug!(
            snapshot_id = %snapshot.id,
            path = %path.display(),
            "Snapshot saved"
        );
        Ok(())
    }

    fn get(&self, id: SnapshotId) -> Result<LogSnapshot, StoreError> {
        let name = format!("{id}.json");
        let path = self
            .files()?
            .into_iter()
            .find(|p| p.file_name().and_then(|n| n.to_str()) == Some(name.as_str()))
            .ok_or(StoreError::NotFound(id))?;

        let snapshot = read_snapshot(&path)?;
        if !snapshot.verify_integrity() {
            return Err(StoreError::IntegrityViolation(id));
        }
        Ok(snapshot)
    }

    /// Unreadable and tampered files are skipped with a warning, so one bad
    /// file never hides the rest of the history.
    fn list(&self) -> Result<Vec<LogSnapshot>, StoreError> {
        let mut snapshots = Vec::new();
        for path in self.files()? {
            let snapshot = match read_snapshot(&path) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable snapshot");
                    continue;
                }
            };
            if !snapshot.verify_integrity() {
                tracing::warn!(snapshot_id = %snapshot.id, "Skipping tampered snapshot");
                continue;
            }
            snapshots.push(snapshot);
        }

        snapshots.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
        Ok(snapshots)
    }
}

fn read_snapshot(path: &Path) -> Result<LogSnapshot, StoreError> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

fn walk_json(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), StoreError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_json(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    Ok(())
}
