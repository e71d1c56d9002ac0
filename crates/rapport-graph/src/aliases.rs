//! Field alias table for the change-message schemas.
//!
//! Each schema revision of the dialogue layer names the same facts
//! differently. The table maps every canonical field to an ordered list of
//! accepted keys; the first key with a usable value wins. A new schema
//! revision only adds keys here.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rapport_core::RawMessage;

/// Fields of a canonical change record that raw messages can supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Source,
    Target,
    NewAttitude,
    NewRelation,
    IntermediatorDialogue,
    RecipientDialogue,
    Rationale,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 7] = [
        CanonicalField::Source,
        CanonicalField::Target,
        CanonicalField::NewAttitude,
        CanonicalField::NewRelation,
        CanonicalField::IntermediatorDialogue,
        CanonicalField::RecipientDialogue,
        CanonicalField::Rationale,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Source => "source",
            CanonicalField::Target => "target",
            CanonicalField::NewAttitude => "new_attitude",
            CanonicalField::NewRelation => "new_relation",
            CanonicalField::IntermediatorDialogue => "intermediator_dialogue",
            CanonicalField::RecipientDialogue => "recipient_dialogue",
            CanonicalField::Rationale => "rationale",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown canonical field: {s}"))
    }
}

/// Accepted keys per field, highest priority first.
///
/// Targets prefer the short-schema `AttAndRelRCPT`, then the dialogue
/// schema's `RecipientID`, then the legacy `starterID`.
pub const DEFAULT_ALIASES: &[(CanonicalField, &[&str])] = &[
    (CanonicalField::Source, &["intermediatorID", "IntermediatorID"]),
    (
        CanonicalField::Target,
        &["AttAndRelRCPT", "RecipientID", "starterID"],
    ),
    (
        CanonicalField::NewAttitude,
        &["ItoR_AttitudeChangeTo", "AttitudeChange"],
    ),
    (
        CanonicalField::NewRelation,
        &["ItoR_RelTypeChangeTo", "RelationshipTypeChange"],
    ),
    (
        CanonicalField::IntermediatorDialogue,
        &["intermediatorDialogue"],
    ),
    (CanonicalField::RecipientDialogue, &["RecipientDialogue"]),
    (CanonicalField::Rationale, &["Rationale"]),
];

/// Data-driven resolver from raw message keys to canonical fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    keys: HashMap<CanonicalField, Vec<String>>,
}

impl Default for AliasTable {
    fn default() -> Self {
        let keys = DEFAULT_ALIASES
            .iter()
            .map(|(field, keys)| (*field, keys.iter().map(|k| k.to_string()).collect()))
            .collect();
        Self { keys }
    }
}

impl AliasTable {
    /// Accepted keys for `field`, highest priority first.
    pub fn keys(&self, field: CanonicalField) -> &[String] {
        self.keys.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append `key` as the lowest-priority alias of `field`.
    pub fn add_alias(&mut self, field: CanonicalField, key: impl Into<String>) {
        let key = key.into();
        let keys = self.keys.entry(field).or_default();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    /// The first usable value for `field` in `message`.
    pub fn resolve(&self, message: &RawMessage, field: CanonicalField) -> Option<String> {
        self.keys(field).iter().find_map(|key| message.text(key))
    }
}
