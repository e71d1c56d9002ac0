//! Rapport Graph: the change-record pipeline for the relationship graph.
//!
//! This crate is the single mutation point for a [`RelationshipGraph`].
//! Raw messages are normalized into canonical records, applied without
//! clobbering untouched fields, and turned into audit entries.

pub mod aliases;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod update;

pub use aliases::{AliasTable, CanonicalField};
pub use error::GraphError;
pub use loader::{load_graph_csv, read_graph_csv};
pub use normalize::{normalize, SchemaNormalizer};
pub use rapport_core::RelationshipGraph;
pub use update::{update_relations, BatchReport, GraphUpdater};
