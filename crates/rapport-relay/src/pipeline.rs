//! Batch replay pipeline.
//!
//! A reader task decodes frames and pushes them into a bounded channel; the
//! calling task is the only consumer and the only writer of the graph and
//! the change log, so batches are applied strictly in arrival order.

use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;

use rapport_core::{MessageBatch, RelationshipGraph};
use rapport_graph::GraphUpdater;
use rapport_ledger::ChangeLog;

use crate::error::Result;
use crate::transport::{self, TransportStats};

/// Final state after the input is exhausted.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub graph: RelationshipGraph,
    pub log: ChangeLog,
    /// Batches applied to the graph.
    pub batches: u64,
    pub transport: TransportStats,
}

/// Drives a stream of batches through a [`GraphUpdater`].
pub struct RelayPipeline {
    updater: GraphUpdater,
    event_prefix: String,
    queue_capacity: usize,
}

impl RelayPipeline {
    pub fn new(updater: GraphUpdater, event_prefix: impl Into<String>, queue_capacity: usize) -> Self {
        Self {
            updater,
            event_prefix: event_prefix.into(),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Replay every frame of `reader` onto `graph`, appending to `log`.
    pub async fn run<R>(
        &self,
        reader: R,
        graph: RelationshipGraph,
        log: ChangeLog,
    ) -> Result<PipelineOutcome>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let reader_task = tokio::spawn(transport::read_batches(reader, tx));

        let (graph, log, batches) = self.consume(rx, graph, log).await;
        let transport = reader_task.await??;

        tracing::info!(
            batches,
            skipped = transport.skipped,
            edges = graph.edge_count(),
            log_entries = log.len(),
            "Replay finished"
        );

        Ok(PipelineOutcome {
            graph,
            log,
            batches,
            transport,
        })
    }

    async fn consume(
        &self,
        mut rx: mpsc::Receiver<MessageBatch>,
        mut graph: RelationshipGraph,
        mut log: ChangeLog,
    ) -> (RelationshipGraph, ChangeLog, u64) {
        let mut sequence: u64 = 0;

        while let Some(batch) = rx.recv().await {
            sequence += 1;
            let event = batch.event_label(&self.event_prefix, sequence);
            let report = self.updater.apply_batch(&event, &mut graph, &batch.messages);
            log.append(report.entries);
        }

        (graph, log, sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(input: &str) -> Cursor<Vec<u8>> {
        Cursor::new(input.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn applies_batches_in_order() {
        let input = concat!(
            "[{\"intermediatorID\": \"Celin\", \"RecipientID\": \"Arthur\", \"ItoR_AttitudeChangeTo\": \"Wary\"}]\n",
            "{\"event\": \"Confrontation\", \"messages\": [{\"intermediatorID\": \"Celin\", \"RecipientID\": \"Arthur\", \"ItoR_AttitudeChangeTo\": \"Hostile\"}]}\n",
            "garbage\n",
            "[{\"intermediatorID\": \"Celin\", \"RecipientID\": \"Arthur\", \"intermediatorStatus\": \"Calm\"}]\n",
        );

        let pipeline = RelayPipeline::new(GraphUpdater::default(), "Event", 1);
        let outcome = pipeline
            .run(reader(input), RelationshipGraph::new(), ChangeLog::new())
            .await
            .unwrap();

        assert_eq!(outcome.batches, 3);
        assert_eq!(outcome.transport.skipped, 1);

        let events: Vec<&str> = outcome.log.all().iter().map(|e| e.event.as_str()).collect();
        assert_eq!(events, vec!["Event 1", "Confrontation"]);

        let second = &outcome.log.all()[1];
        assert_eq!(second.original_attitude.as_deref(), Some("Wary"));
        assert_eq!(
            outcome.graph.get("Celin", "Arthur").unwrap().attitude.as_deref(),
            Some("Hostile")
        );
    }

    #[tokio::test]
    async fn stray_object_lines_do_not_shift_event_numbers() {
        let input = concat!(
            "{\"intermediatorID\": \"Celin\", \"RecipientID\": \"Arthur\", \"ItoR_AttitudeChangeTo\": \"Wary\"}\n",
            "[{\"intermediatorID\": \"Celin\", \"RecipientID\": \"Arthur\", \"ItoR_AttitudeChangeTo\": \"Hostile\"}]\n",
        );

        let pipeline = RelayPipeline::new(GraphUpdater::default(), "Event", 4);
        let outcome = pipeline
            .run(reader(input), RelationshipGraph::new(), ChangeLog::new())
            .await
            .unwrap();

        assert_eq!(outcome.batches, 1);
        assert_eq!(outcome.transport.skipped, 1);
        assert_eq!(outcome.log.all()[0].event, "Event 1");
        assert_eq!(outcome.log.all()[0].original_attitude, None);
    }

    #[tokio::test]
    async fn continues_an_existing_log() {
        let mut log = ChangeLog::new();
        let mut graph = RelationshipGraph::new();
        let seed = GraphUpdater::default().apply_batch(
            "Event 0",
            &mut graph,
            &[serde_json::from_str(
                r#"{"intermediatorID": "Alex", "RecipientID": "Bob", "Rationale": "Old debts"}"#,
            )
            .unwrap()],
        );
        log.append(seed.entries);

        let pipeline = RelayPipeline::new(GraphUpdater::default(), "Scene", 4);
        let outcome = pipeline
            .run(
                reader("[{\"intermediatorID\": \"Alex\", \"RecipientID\": \"Bob\", \"ItoR_RelTypeChangeTo\": \"Creditor\"}]\n"),
                graph,
                log,
            )
            .await
            .unwrap();

        assert_eq!(outcome.log.len(), 2);
        assert_eq!(outcome.log.all()[1].event, "Scene 1");
        assert_eq!(outcome.graph.edge_count(), 1);
    }

    #[tokio::test]
    async fn empty_input_leaves_state_untouched() {
        let pipeline = RelayPipeline::new(GraphUpdater::default(), "Event", 0);
        let outcome = pipeline
            .run(reader(""), RelationshipGraph::new(), ChangeLog::new())
            .await
            .unwrap();

        assert_eq!(outcome.batches, 0);
        assert!(outcome.graph.is_empty());
        assert!(outcome.log.is_empty());
    }
}
