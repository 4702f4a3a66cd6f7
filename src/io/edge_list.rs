//! # EdgeList
//!
//! The edge-list format consists of non-comment lines `u v` representing a
//! directed edge from `u` to `v`, both zero-based. The number of vertices is
//! inferred as the largest mentioned index plus one.

use std::io::{BufRead, ErrorKind, Result, Write};

use super::*;
use crate::prelude::*;

/// A [`GraphReader`] for the edge-list format.
#[derive(Debug, Clone)]
pub struct EdgeListReader {
    /// Lines starting with `comment_identifier` are skipped when reading
    comment_identifier: String,
}

impl Default for EdgeListReader {
    fn default() -> Self {
        Self {
            comment_identifier: "#".to_string(),
        }
    }
}

impl EdgeListReader {
    /// Creates a new (default) reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the comment identifier
    pub fn comment_identifier<S: Into<String>>(mut self, c: S) -> Self {
        self.comment_identifier = c.into();
        self
    }
}

impl GraphReader for EdgeListReader {
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<LoadedGraph> {
        let mut edges: Vec<Edge> = Vec::new();
        let mut n: NumNodes = 0;

        for line in reader.lines() {
            let line = line?;
            if line.starts_with(&self.comment_identifier) || line.trim().is_empty() {
                continue;
            }

            let mut parts = line.split_whitespace();
            let u: Node = parse_next_value!(parts, "Source node");
            let v: Node = parse_next_value!(parts, "Target node");

            n = n.max(u + 1).max(v + 1);
            edges.push(Edge(u, v));
        }

        Ok(LoadedGraph {
            graph: DiGraph::from_edges(n, edges),
            names: None,
        })
    }
}

/// A writer for the edge-list format.
#[derive(Debug, Clone, Default)]
pub struct EdgeListWriter {}

impl EdgeListWriter {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }
}

impl GraphWriter for EdgeListWriter {
    fn try_write_graph<W: Write>(&self, graph: &DiGraph, mut writer: W) -> Result<()> {
        for Edge(u, v) in graph.edges() {
            writeln!(writer, "{u} {v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn read_simple_edge_list() {
        let input = "# a comment\n0 1\n1 2\n\n2 0\n";
        let loaded = EdgeListReader::new()
            .try_read_graph(input.as_bytes())
            .unwrap();

        assert_eq!(loaded.graph.number_of_nodes(), 3);
        assert_eq!(
            loaded.graph.edges().collect_vec(),
            vec![Edge(0, 1), Edge(1, 2), Edge(2, 0)]
        );
        assert!(loaded.names.is_none());
    }

    #[test]
    fn malformed_line_is_an_error() {
        assert!(EdgeListReader::new().try_read_graph("0 x\n".as_bytes()).is_err());
        assert!(EdgeListReader::new().try_read_graph("0\n".as_bytes()).is_err());
    }

    #[test]
    fn round_trip() {
        let graph = DiGraph::from_edges(4, [(0, 1), (2, 3), (3, 0)]);

        let mut buffer = Vec::new();
        EdgeListWriter::new()
            .try_write_graph(&graph, &mut buffer)
            .unwrap();

        let loaded = EdgeListReader::new()
            .try_read_graph(buffer.as_slice())
            .unwrap();
        assert_eq!(
            loaded.graph.edges().collect_vec(),
            graph.edges().collect_vec()
        );
    }
}
