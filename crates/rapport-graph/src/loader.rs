//! Initial graph loading from a CSV relation table.
//!
//! Expected header: `SourceNPCID,TargetNPCID,Attitude,AttitudeScore,relation`.
//! Older exports spell the target column `TargerNPCID`; both are accepted.
//! Identifiers carry numeric suffixes (`Celin01`) that are stripped before
//! the usual identifier normalization.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use rapport_core::{RelationEntry, RelationshipGraph};
use serde::Deserialize;

use crate::error::{GraphError, Result};

#[derive(Debug, Deserialize)]
struct RelationRow {
    #[serde(rename = "SourceNPCID")]
    source: String,
    #[serde(rename = "TargetNPCID", alias = "TargerNPCID")]
    target: String,
    #[serde(rename = "Attitude", default)]
    attitude: Option<String>,
    #[serde(rename = "AttitudeScore", default)]
    attitude_score: Option<f64>,
    #[serde(rename = "relation", default)]
    relation: Option<String>,
}

/// Load the initial graph from a CSV file.
pub fn load_graph_csv(path: impl AsRef<Path>) -> Result<RelationshipGraph> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let graph = read_graph_csv(file)?;
    tracing::info!(
        path = %path.display(),
        sources = graph.source_count(),
        edges = graph.edge_count(),
        "Initial graph loaded"
    );
    Ok(graph)
}

/// Build a graph from CSV rows. A later row for the same pair replaces an
/// earlier one.
pub fn read_graph_csv<R: Read>(reader: R) -> Result<RelationshipGraph> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut graph = RelationshipGraph::new();
    for (idx, result) in rdr.deserialize::<RelationRow>().enumerate() {
        let row = result?;
        // Header is line 1.
        let line = idx as u64 + 2;

        let source = strip_digits(&row.source);
        let target = strip_digits(&row.target);
        if source.trim().is_empty() || target.trim().is_empty() {
            return Err(GraphError::InvalidRow {
                line,
                reason: format!(
                    "blank identifier after stripping digits: {:?} -> {:?}",
                    row.source, row.target
                ),
            });
        }

        graph.insert(
            &source,
            &target,
            RelationEntry {
                attitude: row.attitude.filter(|s| !s.is_empty()),
                attitude_score: row.attitude_score,
                relation_type: row.relation.filter(|s| !s.is_empty()),
            },
        );
    }

    Ok(graph)
}

fn strip_digits(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_rows_and_strips_suffixes() {
        let csv = "\
SourceNPCID,TargerNPCID,Attitude,AttitudeScore,relation
Celin01,Alex02,Loving,90,Wife of
Celin01,Arthur03,Neutral,50,Stranger
alex02,celin01,Loving,85,Husband of
";
        let graph = read_graph_csv(csv.as_bytes()).unwrap();

        assert_eq!(graph.source_count(), 2);
        assert_eq!(graph.edge_count(), 3);

        let edge = graph.get("Celin", "Alex").unwrap();
        assert_eq!(edge.attitude.as_deref(), Some("Loving"));
        assert_eq!(edge.attitude_score, Some(90.0));
        assert_eq!(edge.relation_type.as_deref(), Some("Wife of"));

        assert!(graph.get("Alex", "Celin").is_some());
    }

    #[test]
    fn accepts_corrected_header_and_empty_cells() {
        let csv = "\
SourceNPCID,TargetNPCID,Attitude,AttitudeScore,relation
Bob7, Alex ,,,
";
        let graph = read_graph_csv(csv.as_bytes()).unwrap();
        let edge = graph.get("Bob", "Alex").unwrap();
        assert!(edge.is_empty());
    }

    #[test]
    fn later_rows_replace_earlier_ones() {
        let csv = "\
SourceNPCID,TargetNPCID,Attitude,AttitudeScore,relation
Celin1,Alex1,Loving,90,Wife of
Celin2,Alex2,Annoyed,40,Wife of
";
        let graph = read_graph_csv(csv.as_bytes()).unwrap();
        assert_eq!(graph.edge_count(), 1);
        let edge = graph.get("Celin", "Alex").unwrap();
        assert_eq!(edge.attitude.as_deref(), Some("Annoyed"));
        assert_eq!(edge.attitude_score, Some(40.0));
    }

    #[test]
    fn numeric_only_identifier_is_rejected() {
        let csv = "\
SourceNPCID,TargetNPCID,Attitude,AttitudeScore,relation
Celin,Alex,Loving,90,Wife of
123,Alex,Loving,90,Wife of
";
        let err = read_graph_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, GraphError::InvalidRow { line: 3, .. }));
    }

    #[test]
    fn malformed_score_is_a_csv_error() {
        let csv = "\
SourceNPCID,TargetNPCID,Attitude,AttitudeScore,relation
Celin,Alex,Loving,very,Wife of
";
        let err = read_graph_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, GraphError::Csv(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_graph_csv("/nonexistent/initialRelations.csv").unwrap_err();
        assert!(matches!(err, GraphError::Io(_)));
    }
}
