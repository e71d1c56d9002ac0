//! Schema normalization: reconcile heterogeneous raw messages into one
//! canonical change record per `(source, target)` pair.

use std::collections::HashMap;

use rapport_core::{normalize_node_id, ChangeRecord, RawMessage};

use crate::aliases::{AliasTable, CanonicalField};

/// Converts one batch of raw fragments into canonical change records.
#[derive(Debug, Clone, Default)]
pub struct SchemaNormalizer {
    aliases: AliasTable,
}

impl SchemaNormalizer {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    /// Merge a batch into canonical records, in first-seen pair order.
    ///
    /// Fragments without a resolvable source or target are dropped. Within
    /// a pair, a later non-null value replaces an earlier one; a null never
    /// clears anything. Fragments never influence a pair other than their own.
    /// Keys outside the alias table, such as `intermediatorStatus`, are
    /// ignored, so a status-only fragment yields a record with no payload.
    pub fn normalize(&self, messages: &[RawMessage]) -> Vec<ChangeRecord> {
        let mut records: Vec<ChangeRecord> = Vec::new();
        let mut index: HashMap<(String, String), usize> = HashMap::new();

        for (position, message) in messages.iter().enumerate() {
            let Some(source) = self.resolve_node(message, CanonicalField::Source) else {
                tracing::debug!(position, "Dropping fragment without source");
                continue;
            };
            let Some(target) = self.resolve_node(message, CanonicalField::Target) else {
                tracing::debug!(position, %source, "Dropping fragment without target");
                continue;
            };

            let slot = *index
                .entry((source.clone(), target.clone()))
                .or_insert_with(|| {
                    records.push(ChangeRecord::new(source, target));
                    records.len() - 1
                });
            let record = &mut records[slot];

            let field = |f| self.aliases.resolve(message, f);
            overwrite(&mut record.new_attitude, field(CanonicalField::NewAttitude));
            overwrite(&mut record.new_relation, field(CanonicalField::NewRelation));
            overwrite(
                &mut record.intermediator_dialogue,
                field(CanonicalField::IntermediatorDialogue),
            );
            overwrite(
                &mut record.recipient_dialogue,
                field(CanonicalField::RecipientDialogue),
            );
            overwrite(&mut record.rationale, field(CanonicalField::Rationale));
        }

        tracing::debug!(
            fragments = messages.len(),
            records = records.len(),
            "Batch normalized"
        );
        records
    }

    fn resolve_node(&self, message: &RawMessage, field: CanonicalField) -> Option<String> {
        self.aliases
            .resolve(message, field)
            .map(|raw| normalize_node_id(&raw))
            .filter(|id| !id.is_empty())
    }
}

/// Normalize a batch with the default alias table.
pub fn normalize(messages: &[RawMessage]) -> Vec<ChangeRecord> {
    SchemaNormalizer::default().normalize(messages)
}

fn overwrite(slot: &mut Option<String>, incoming: Option<String>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}
