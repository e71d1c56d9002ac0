//! Rapport Ledger: the append-only audit trail of relationship changes.
//!
//! A [`ChangeLog`] accumulates [`ChangeLogEntry`] values across many events
//! and never rewrites or drops them. Consumers never see the live log; they
//! receive a [`LogSnapshot`], an immutable copy content-hashed with BLAKE3 so
//! that any later modification of a stored snapshot is detectable.

pub mod hash;
pub mod log;
pub mod store;
pub mod view;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use log::ChangeLog;
pub use rapport_core::ChangeLogEntry;

// ── Core Types ───────────────────────────────────────────────────

/// Unique identifier for a log snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SnapshotId(pub Uuid);

impl SnapshotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable copy of a change log at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogSnapshot {
    /// Unique snapshot identifier.
    pub id: SnapshotId,
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,
    /// Every entry of the log, in append order.
    pub entries: Vec<ChangeLogEntry>,
    /// BLAKE3 content hash (hex), set when the snapshot is taken.
    pub content_hash: Option<String>,
}

impl LogSnapshot {
    /// Compute the BLAKE3 hash of the snapshot's content.
    /// The hash covers all fields except `content_hash` itself.
    pub fn compute_hash(&self) -> String {
        hash::compute_snapshot_hash(self)
    }

    /// Verify that the stored content_hash matches a freshly computed hash.
    pub fn verify_integrity(&self) -> bool {
        match &self.content_hash {
            Some(stored) => stored == &self.compute_hash(),
            None => false,
        }
    }

    /// Read-only grouping of the entries by source, then target.
    pub fn grouped(&self) -> Vec<view::SourceGroup<'_>> {
        view::group_by_pair(&self.entries)
    }
}
