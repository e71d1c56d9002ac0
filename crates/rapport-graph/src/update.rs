//! Apply canonical change records to the relationship graph and produce
//! the audit entries for the change log.

use rapport_core::{
    normalize_node_id, ChangeLogEntry, ChangeRecord, RawMessage, RelationshipGraph,
};
use rapport_ledger::ChangeLog;

use crate::normalize::SchemaNormalizer;

/// The outcome of applying one batch.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchReport {
    /// Canonical records applied to the graph.
    pub records: usize,
    /// Edges that did not exist before this batch.
    pub edges_created: usize,
    /// Audit entries, in record order.
    pub entries: Vec<ChangeLogEntry>,
}

/// The single writer of a [`RelationshipGraph`].
///
/// Edge creation followed by attribute writes is not atomic; callers that
/// share a graph across tasks must serialize calls to the updater.
#[derive(Debug, Clone, Default)]
pub struct GraphUpdater {
    normalizer: SchemaNormalizer,
}

impl GraphUpdater {
    pub fn new(normalizer: SchemaNormalizer) -> Self {
        Self { normalizer }
    }

    /// Normalize a raw batch and apply it to `graph`.
    pub fn apply_batch(
        &self,
        event: &str,
        graph: &mut RelationshipGraph,
        messages: &[RawMessage],
    ) -> BatchReport {
        let records = self.normalizer.normalize(messages);
        let report = self.apply_records(event, graph, &records);

        tracing::info!(
            event,
            fragments = messages.len(),
            records = report.records,
            edges_created = report.edges_created,
            entries = report.entries.len(),
            "Batch applied"
        );
        report
    }

    /// Apply records that were already normalized.
    pub fn apply_records(
        &self,
        event: &str,
        graph: &mut RelationshipGraph,
        records: &[ChangeRecord],
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for record in records {
            let source = normalize_node_id(&record.source);
            let target = normalize_node_id(&record.target);
            if source.is_empty() || target.is_empty() {
                tracing::debug!(event, "Skipping record with blank endpoint");
                continue;
            }

            let original = graph.get(&source, &target);
            let original_attitude = original.and_then(|e| e.attitude.clone());
            let original_relation = original.and_then(|e| e.relation_type.clone());

            let (edge, created) = graph.edge_or_default(&source, &target);
            if let Some(attitude) = &record.new_attitude {
                edge.attitude = Some(attitude.clone());
            }
            if let Some(relation) = &record.new_relation {
                edge.relation_type = Some(relation.clone());
            }

            report.records += 1;
            if created {
                report.edges_created += 1;
            }

            if !record.is_substantive() {
                tracing::trace!(event, %source, %target, "No audit entry for record without payload");
                continue;
            }

            report.entries.push(ChangeLogEntry {
                event: event.to_string(),
                source,
                target,
                original_attitude,
                new_attitude: record.new_attitude.clone(),
                original_relation,
                new_relation: record.new_relation.clone(),
                intermediator_dialogue: record.intermediator_dialogue.clone(),
                recipient_dialogue: record.recipient_dialogue.clone(),
                rationale: record.rationale.clone(),
            });
        }

        report
    }

    /// Apply one batch and append its entries to `log`.
    ///
    /// Takes and returns ownership so callers can thread graph and log
    /// through a sequence of events.
    pub fn update(
        &self,
        event: &str,
        mut graph: RelationshipGraph,
        messages: &[RawMessage],
        mut log: ChangeLog,
    ) -> (RelationshipGraph, ChangeLog) {
        let report = self.apply_batch(event, &mut graph, messages);
        log.append(report.entries);
        (graph, log)
    }
}

/// [`GraphUpdater::update`] with the default alias table.
pub fn update_relations(
    event: &str,
    graph: RelationshipGraph,
    messages: &[RawMessage],
    log: ChangeLog,
) -> (RelationshipGraph, ChangeLog) {
    GraphUpdater::default().update(event, graph, messages, log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapport_core::RelationEntry;

    fn friendly_graph() -> RelationshipGraph {
        let mut graph = RelationshipGraph::new();
        graph.insert(
            "Celin",
            "Alex",
            RelationEntry {
                attitude: Some("Friendly".to_string()),
                attitude_score: Some(80.0),
                relation_type: Some("Wife of".to_string()),
            },
        );
        graph
    }

    #[test]
    fn null_fields_leave_edge_untouched() {
        let mut graph = friendly_graph();
        let record = ChangeRecord {
            new_relation: Some("Ally".to_string()),
            ..ChangeRecord::new("Celin", "Alex")
        };

        let report = GraphUpdater::default().apply_records("1", &mut graph, &[record]);

        let edge = graph.get("Celin", "Alex").unwrap();
        assert_eq!(edge.attitude.as_deref(), Some("Friendly"));
        assert_eq!(edge.relation_type.as_deref(), Some("Ally"));
        assert_eq!(edge.attitude_score, Some(80.0));

        assert_eq!(report.records, 1);
        assert_eq!(report.edges_created, 0);
        let entry = &report.entries[0];
        assert_eq!(entry.original_attitude.as_deref(), Some("Friendly"));
        assert_eq!(entry.new_attitude, None);
        assert_eq!(entry.original_relation.as_deref(), Some("Wife of"));
        assert_eq!(entry.new_relation.as_deref(), Some("Ally"));
    }

    #[test]
    fn status_only_record_creates_edge_without_entry() {
        let mut graph = RelationshipGraph::new();
        let report = GraphUpdater::default().apply_records(
            "1",
            &mut graph,
            &[ChangeRecord::new("Celin", "Arthur")],
        );

        assert!(report.entries.is_empty());
        assert_eq!(report.edges_created, 1);
        assert!(graph.get("Celin", "Arthur").unwrap().is_empty());
    }

    #[test]
    fn dialogue_only_record_is_audited() {
        let mut graph = friendly_graph();
        let record = ChangeRecord {
            intermediator_dialogue: Some("Arthur said something troubling.".to_string()),
            ..ChangeRecord::new("celin", "alex")
        };

        let report = GraphUpdater::default().apply_records("2", &mut graph, &[record]);
        assert_eq!(report.entries.len(), 1);
        let entry = &report.entries[0];
        assert_eq!(entry.source, "Celin");
        assert_eq!(entry.target, "Alex");
        assert_eq!(entry.original_attitude.as_deref(), Some("Friendly"));
        assert_eq!(entry.new_attitude, None);
        assert_eq!(
            graph.get("Celin", "Alex").unwrap().attitude.as_deref(),
            Some("Friendly")
        );
    }

    #[test]
    fn blank_endpoints_are_skipped() {
        let mut graph = RelationshipGraph::new();
        let record = ChangeRecord {
            new_attitude: Some("Wary".to_string()),
            ..ChangeRecord::new(" ", "Arthur")
        };

        let report = GraphUpdater::default().apply_records("1", &mut graph, &[record]);
        assert_eq!(report, BatchReport::default());
        assert!(graph.is_empty());
    }
}
