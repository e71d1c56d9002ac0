//! Change-log persistence: resume from and store hashed snapshots.

use rapport_ledger::store::{FileLogStore, LogStore};
use rapport_ledger::{ChangeLog, SnapshotId};

use crate::error::Result;

/// Open the snapshot store and, when `resume` is set, rebuild the log from
/// the most recent intact snapshot.
pub fn open_log(log_dir: &str, resume: bool) -> Result<(FileLogStore, ChangeLog)> {
    let store = FileLogStore::new(log_dir)?;

    if !resume {
        return Ok((store, ChangeLog::new()));
    }

    let log = match store.latest()? {
        Some(snapshot) => {
            tracing::info!(
                snapshot_id = %snapshot.id,
                entries = snapshot.entries.len(),
                "Resuming change log"
            );
            ChangeLog::from_snapshot(snapshot)
        }
        None => {
            tracing::info!(log_dir, "No snapshot to resume, starting a new change log");
            ChangeLog::new()
        }
    };
    Ok((store, log))
}

/// Take a snapshot of `log` and store it.
pub fn store_snapshot(store: &impl LogStore, log: &ChangeLog) -> Result<SnapshotId> {
    let snapshot = log.snapshot();
    store.save(&snapshot)?;

    tracing::info!(
        snapshot_id = %snapshot.id,
        entries = snapshot.entries.len(),
        "Change log snapshot recorded"
    );
    Ok(snapshot.id)
}
