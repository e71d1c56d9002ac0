//! rapport-core: Shared types, configuration, and error handling for Rapport.
//!
//! This crate provides the foundational types used across all Rapport components:
//! - The relationship graph between NPCs and its edge attributes
//! - Raw change messages, canonical change records, and audit log entries
//! - The batch envelope of the line-delimited transport
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use error::RapportError;
pub use events::MessageBatch;
pub use types::{
    normalize_node_id, ChangeLogEntry, ChangeRecord, RawMessage, RelationEntry,
    RelationshipGraph,
};
