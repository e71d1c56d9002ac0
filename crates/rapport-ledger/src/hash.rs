//! BLAKE3 content hashing for tamper evidence.
//!
//! Computes a deterministic hash of all snapshot fields (excluding the
//! content_hash itself) so that any modification is detectable.

use serde::Serialize;

use crate::{ChangeLogEntry, LogSnapshot, SnapshotId};

/// Hashable representation of a snapshot (excludes content_hash).
#[derive(Serialize)]
struct HashableSnapshot<'a> {
    id: &'a SnapshotId,
    taken_at: &'a chrono::DateTime<chrono::Utc>,
    entries: &'a [ChangeLogEntry],
}

/// Compute the BLAKE3 hash of a snapshot's content.
///
/// Serializes all fields except `content_hash` to canonical JSON,
/// then hashes the bytes with BLAKE3. Returns the hex-encoded hash.
pub fn compute_snapshot_hash(snapshot: &LogSnapshot) -> String {
    let hashable = HashableSnapshot {
        id: &snapshot.id,
        taken_at: &snapshot.taken_at,
        entries: &snapshot.entries,
    };

    let json = serde_json::to_vec(&hashable).expect("Snapshot serialization should not fail");
    blake3::hash(&json).to_hex().to_string()
}
