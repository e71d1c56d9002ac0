//! Line-delimited JSON transport: one batch per line.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use rapport_core::MessageBatch;

use crate::error::Result;

/// Counters of one transport run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransportStats {
    /// Frames decoded and handed to the consumer.
    pub frames: u64,
    /// Non-blank lines that could not be decoded.
    pub skipped: u64,
}

/// Read frames from `reader` and forward them in order.
///
/// Blank lines are ignored and undecodable lines are logged and skipped.
/// Stops at end of input or when the consumer hangs up.
pub async fn read_batches<R>(reader: R, tx: mpsc::Sender<MessageBatch>) -> Result<TransportStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = TransportStats::default();
    let mut line_no: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        match MessageBatch::from_json_line(&line) {
            Ok(batch) => {
                if tx.send(batch).await.is_err() {
                    tracing::warn!(line = line_no, "Consumer closed, stopping reader");
                    break;
                }
                stats.frames += 1;
            }
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Skipping undecodable frame");
                stats.skipped += 1;
            }
        }
    }

    tracing::debug!(frames = stats.frames, skipped = stats.skipped, "Input exhausted");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn forwards_frames_and_skips_garbage() {
        let input = concat!(
            "[{\"intermediatorID\": \"Celin\", \"RecipientID\": \"Arthur\"}]\n",
            "\n",
            "this is not json\n",
            "{\"event\": \"Market day\", \"messages\": []}\n",
        );

        let (tx, mut rx) = mpsc::channel(8);
        let stats = read_batches(Cursor::new(input.as_bytes().to_vec()), tx)
            .await
            .unwrap();

        assert_eq!(stats, TransportStats { frames: 2, skipped: 1 });

        let first = rx.recv().await.unwrap();
        assert_eq!(first.event, None);
        assert_eq!(first.messages.len(), 1);

        let second = rx.recv().await.unwrap();
        assert_eq!(second.event.as_deref(), Some("Market day"));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn stops_when_consumer_hangs_up() {
        let input = "[]\n[]\n[]\n";
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let stats = read_batches(Cursor::new(input.as_bytes().to_vec()), tx)
            .await
            .unwrap();
        assert_eq!(stats.frames, 0);
    }
}
