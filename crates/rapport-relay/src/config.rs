//! Configuration for the rapport-relay replayer.

use std::collections::HashMap;

use rapport_graph::{AliasTable, CanonicalField};
use serde::Deserialize;

use crate::error::{RelayError, Result};

/// Top-level relay configuration.
///
/// Loaded from `rapport.toml` `[relay]` section or
/// `RAPPORT__RELAY__` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Prefix of generated event labels ("Event 1", "Event 2", ...).
    #[serde(default = "default_event_prefix")]
    pub event_prefix: String,

    /// Directory for change-log snapshots.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// CSV file with the initial relation table.
    #[serde(default)]
    pub initial_graph: Option<String>,

    /// Batches buffered between the reader and the graph writer.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Extra message keys per canonical field, appended after the built-in
    /// aliases, e.g. `target = ["listenerID"]`.
    #[serde(default)]
    pub aliases: HashMap<String, Vec<String>>,
}

impl RelayConfig {
    /// The built-in alias table extended with the configured keys.
    pub fn alias_table(&self) -> Result<AliasTable> {
        let mut table = AliasTable::default();
        for (field, keys) in &self.aliases {
            let field: CanonicalField = field.parse().map_err(RelayError::Config)?;
            for key in keys {
                table.add_alias(field, key.as_str());
            }
        }
        Ok(table)
    }
}

fn default_event_prefix() -> String {
    "Event".to_string()
}

fn default_log_dir() -> String {
    "./changelog".to_string()
}

fn default_queue_capacity() -> usize {
    64
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            event_prefix: default_event_prefix(),
            log_dir: default_log_dir(),
            initial_graph: None,
            queue_capacity: default_queue_capacity(),
            aliases: HashMap::new(),
        }
    }
}
