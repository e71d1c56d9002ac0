//! Batch envelope for the line-delimited JSON transport.
//!
//! Each line carries one batch of raw messages, either as a bare JSON array
//! or wrapped in an object that also names the event.

use serde::{Deserialize, Serialize};

use crate::types::RawMessage;

/// One ordered batch of raw messages belonging to a single event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageBatch {
    /// Event label supplied by the sender, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default)]
    pub messages: Vec<RawMessage>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Frame {
    Bare(Vec<RawMessage>),
    Labeled(LabeledFrame),
}

/// The object form of a line. `messages` is mandatory and no other keys are
/// allowed, so a lone message object or a misspelled envelope is rejected
/// instead of decoding as an empty batch.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LabeledFrame {
    #[serde(default)]
    event: Option<String>,
    messages: Vec<RawMessage>,
}

impl MessageBatch {
    pub fn new(event: Option<String>, messages: Vec<RawMessage>) -> Self {
        Self { event, messages }
    }

    /// Decode one transport line.
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        Ok(match serde_json::from_str::<Frame>(line.trim())? {
            Frame::Bare(messages) => Self {
                event: None,
                messages,
            },
            Frame::Labeled(LabeledFrame { event, messages }) => Self { event, messages },
        })
    }

    /// The sender's label, or `"{prefix} {sequence}"` when none was given.
    pub fn event_label(&self, prefix: &str, sequence: u64) -> String {
        match self.event.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => format!("{prefix} {sequence}"),
        }
    }
}
