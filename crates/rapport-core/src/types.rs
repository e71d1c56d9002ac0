//! Core domain types for the Rapport relationship graph.
//!
//! These types describe the directed edges between NPCs, the raw change
//! messages that arrive from the dialogue layer, and the audit entries the
//! update pipeline produces from them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Node identifiers ──────────────────────────────────────────────

/// Normalize a node identifier.
///
/// Surrounding whitespace is trimmed, the first character is upper-cased and
/// the rest lower-cased, so `"celin"`, `" Celin "` and `"CELIN"` all name the
/// node `"Celin"`. Every path that reads or writes the graph goes through
/// this function.
pub fn normalize_node_id(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// ── Relationship graph ────────────────────────────────────────────

/// Attributes of one directed edge: how `source` regards `target`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationEntry {
    #[serde(rename = "Attitude", default, skip_serializing_if = "Option::is_none")]
    pub attitude: Option<String>,

    /// Set only when the graph is loaded; the update pipeline never touches it.
    #[serde(
        rename = "AttitudeScore",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub attitude_score: Option<f64>,

    #[serde(rename = "relation", default, skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<String>,
}

impl RelationEntry {
    pub fn is_empty(&self) -> bool {
        self.attitude.is_none() && self.attitude_score.is_none() && self.relation_type.is_none()
    }
}

/// Two-level mapping `source -> target -> RelationEntry`.
///
/// Keys are always normalized with [`normalize_node_id`]; callers may pass
/// names in any case. Serializes as a plain nested JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipGraph {
    edges: BTreeMap<String, BTreeMap<String, RelationEntry>>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the edge `source -> target`.
    pub fn get(&self, source: &str, target: &str) -> Option<&RelationEntry> {
        self.edges
            .get(&normalize_node_id(source))?
            .get(&normalize_node_id(target))
    }

    /// Return the edge `source -> target`, creating an empty entry if absent.
    ///
    /// The flag is `true` when the edge did not exist before the call.
    pub fn edge_or_default(&mut self, source: &str, target: &str) -> (&mut RelationEntry, bool) {
        let targets = self.edges.entry(normalize_node_id(source)).or_default();
        let target = normalize_node_id(target);
        let created = !targets.contains_key(&target);
        (targets.entry(target).or_default(), created)
    }

    /// Insert or replace the edge `source -> target`.
    pub fn insert(&mut self, source: &str, target: &str, entry: RelationEntry) {
        self.edges
            .entry(normalize_node_id(source))
            .or_default()
            .insert(normalize_node_id(target), entry);
    }

    /// Number of nodes with at least one outgoing edge.
    pub fn source_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Raw messages ──────────────────────────────────────────────────

/// One raw change fragment as received from the dialogue layer.
///
/// Field names depend on which schema revision produced the message; see
/// the alias table in `rapport-graph` for the recognized keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawMessage(pub Map<String, Value>);

impl RawMessage {
    /// The value under `key` as text.
    ///
    /// Strings are returned as-is, numbers and booleans as their JSON text.
    /// Missing keys, `null`, arrays, objects and blank strings yield `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl From<Map<String, Value>> for RawMessage {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ── Canonical records ─────────────────────────────────────────────

/// All fragments for one `(source, target)` pair of a batch, merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub source: String,
    pub target: String,
    pub new_attitude: Option<String>,
    pub new_relation: Option<String>,
    pub intermediator_dialogue: Option<String>,
    pub recipient_dialogue: Option<String>,
    pub rationale: Option<String>,
}

impl ChangeRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    /// Whether the record deserves an audit entry.
    ///
    /// Status-only fragments merge into records with every field `None`.
    pub fn is_substantive(&self) -> bool {
        self.new_attitude.is_some()
            || self.new_relation.is_some()
            || self.intermediator_dialogue.is_some()
            || self.recipient_dialogue.is_some()
            || self.rationale.is_some()
    }
}

// ── Audit entries ─────────────────────────────────────────────────

/// One immutable audit record: before/after values of an edge plus the
/// dialogue and rationale that accompanied the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLogEntry {
    /// Caller-supplied label of the batch that produced this entry.
    pub event: String,
    pub source: String,
    pub target: String,
    pub original_attitude: Option<String>,
    pub new_attitude: Option<String>,
    pub original_relation: Option<String>,
    pub new_relation: Option<String>,
    pub intermediator_dialogue: Option<String>,
    pub recipient_dialogue: Option<String>,
    pub rationale: Option<String>,
}
