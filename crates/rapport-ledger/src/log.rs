//! The live, append-only change log.
//!
//! The update pipeline appends entries after every event; consumers take a
//! snapshot and never touch the live log:
//!
//! ```
//! # use rapport_ledger::{ChangeLog, ChangeLogEntry};
//! let mut log = ChangeLog::new();
//! log.append([ChangeLogEntry {
//!     event: "1".to_string(),
//!     source: "Celin".to_string(),
//!     target: "Arthur".to_string(),
//!     original_attitude: None,
//!     new_attitude: Some("Wary".to_string()),
//!     original_relation: None,
//!     new_relation: Some("Distant".to_string()),
//!     intermediator_dialogue: None,
//!     recipient_dialogue: None,
//!     rationale: None,
//! }]);
//! let snapshot = log.snapshot();
//! assert!(snapshot.verify_integrity());
//! assert_eq!(snapshot.entries.len(), 1);
//! ```

use chrono::Utc;
use serde::Serialize;

use crate::{ChangeLogEntry, LogSnapshot, SnapshotId};

/// Ordered sequence of audit entries across many events.
///
/// Entries can only be appended; there is no API to edit, remove, or
/// deduplicate them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChangeLog {
    entries: Vec<ChangeLogEntry>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a log from a stored snapshot.
    pub fn from_snapshot(snapshot: LogSnapshot) -> Self {
        Self {
            entries: snapshot.entries,
        }
    }

    /// Append entries in order. Returns how many were added.
    pub fn append(&mut self, entries: impl IntoIterator<Item = ChangeLogEntry>) -> usize {
        let before = self.entries.len();
        self.entries.extend(entries);
        let added = self.entries.len() - before;
        if added > 0 {
            tracing::debug!(added, total = self.entries.len(), "Change log extended");
        }
        added
    }

    /// Every entry, in append order.
    pub fn all(&self) -> &[ChangeLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take an immutable, content-hashed copy of the log.
    pub fn snapshot(&self) -> LogSnapshot {
        let mut snapshot = LogSnapshot {
            id: SnapshotId::new(),
            taken_at: Utc::now(),
            entries: self.entries.clone(),
            content_hash: None,
        };
        snapshot.content_hash = Some(snapshot.compute_hash());
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(event: &str, target: &str) -> ChangeLogEntry {
        ChangeLogEntry {
            event: event.to_string(),
            source: "Celin".to_string(),
            target: target.to_string(),
            original_attitude: None,
            new_attitude: Some("Fearful".to_string()),
            original_relation: None,
            new_relation: None,
            intermediator_dialogue: None,
            recipient_dialogue: None,
            rationale: None,
        }
    }

    #[test]
    fn append_preserves_order_and_duplicates() {
        let mut log = ChangeLog::new();
        assert!(log.is_empty());

        assert_eq!(log.append([entry("1", "Arthur"), entry("1", "Alex")]), 2);
        assert_eq!(log.append([entry("1", "Arthur")]), 1);
        assert_eq!(log.append(Vec::new()), 0);

        let targets: Vec<&str> = log.all().iter().map(|e| e.target.as_str()).collect();
        assert_eq!(targets, vec!["Arthur", "Alex", "Arthur"]);
        assert_eq!(log.all()[0], log.all()[2]);
    }

    #[test]
    fn snapshot_is_detached_from_live_log() {
        let mut log = ChangeLog::new();
        log.append([entry("1", "Arthur")]);

        let snapshot = log.snapshot();
        log.append([entry("2", "Alex")]);

        assert_eq!(snapshot.entries.len(), 1);
        assert_eq!(log.len(), 2);
        assert!(snapshot.verify_integrity());
    }

    #[test]
    fn resume_from_snapshot() {
        let mut log = ChangeLog::new();
        log.append([entry("1", "Arthur")]);

        let mut resumed = ChangeLog::from_snapshot(log.snapshot());
        resumed.append([entry("2", "Alex")]);
        assert_eq!(resumed.len(), 2);
        assert_eq!(resumed.all()[0].event, "1");
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut log = ChangeLog::new();
        log.append([entry("1", "Arthur")]);
        let json = serde_json::to_value(&log).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["target"], "Arthur");
    }
}
