//! Read-only presentation view of a change log.
//!
//! Renderers browse the log by picking a source NPC, then one of its
//! targets, then reading that pair's entries in order. This module builds
//! exactly that shape and hides fields that carry nothing to show.

use crate::ChangeLogEntry;

/// All entries whose source is `source`, split by target.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceGroup<'a> {
    pub source: &'a str,
    /// Targets in the order they first appear in the log.
    pub targets: Vec<TargetGroup<'a>>,
}

/// All entries for one `(source, target)` pair, in log order.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetGroup<'a> {
    pub target: &'a str,
    pub entries: Vec<&'a ChangeLogEntry>,
}

/// Group entries by source, then target, both in discovery order.
pub fn group_by_pair(entries: &[ChangeLogEntry]) -> Vec<SourceGroup<'_>> {
    let mut groups: Vec<SourceGroup<'_>> = Vec::new();

    for entry in entries {
        let source_pos = match groups.iter().position(|g| g.source == entry.source) {
            Some(pos) => pos,
            None => {
                groups.push(SourceGroup {
                    source: &entry.source,
                    targets: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let targets = &mut groups[source_pos].targets;
        match targets.iter_mut().find(|t| t.target == entry.target) {
            Some(group) => group.entries.push(entry),
            None => targets.push(TargetGroup {
                target: &entry.target,
                entries: vec![entry],
            }),
        }
    }

    groups
}

/// A before → after change of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueChange<'a> {
    pub from: Option<&'a str>,
    pub to: &'a str,
}

/// The displayable parts of one entry.
///
/// An attribute change is shown only when a new value was recorded;
/// dialogue lines and rationale only when they are not blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView<'a> {
    pub event: &'a str,
    pub attitude: Option<ValueChange<'a>>,
    pub relation: Option<ValueChange<'a>>,
    pub intermediator_dialogue: Option<&'a str>,
    pub recipient_dialogue: Option<&'a str>,
    pub rationale: Option<&'a str>,
}

impl<'a> EntryView<'a> {
    /// Whether nothing in the entry is worth showing.
    pub fn is_empty(&self) -> bool {
        self.attitude.is_none()
            && self.relation.is_none()
            && self.intermediator_dialogue.is_none()
            && self.recipient_dialogue.is_none()
            && self.rationale.is_none()
    }
}

impl<'a> From<&'a ChangeLogEntry> for EntryView<'a> {
    fn from(entry: &'a ChangeLogEntry) -> Self {
        Self {
            event: &entry.event,
            attitude: change(&entry.original_attitude, &entry.new_attitude),
            relation: change(&entry.original_relation, &entry.new_relation),
            intermediator_dialogue: non_blank(&entry.intermediator_dialogue),
            recipient_dialogue: non_blank(&entry.recipient_dialogue),
            rationale: non_blank(&entry.rationale),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn change<'a>(from: &'a Option<String>, to: &'a Option<String>) -> Option<ValueChange<'a>> {
    Some(ValueChange {
        from: non_blank(from),
        to: non_blank(to)?,
    })
}
