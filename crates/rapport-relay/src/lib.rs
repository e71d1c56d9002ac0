//! rapport-relay: Replays change batches into the Rapport relationship graph.
//!
//! Reads line-delimited JSON batches, funnels them through a single graph
//! writer, and stores the resulting change log as a hashed snapshot.

pub mod config;
pub mod error;
pub mod persist;
pub mod pipeline;
pub mod transport;
