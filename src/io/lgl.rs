//! # LGL
//!
//! The LGL format of the Large Graph Layout suite: a line `# source` opens
//! a block, and every following plain line names a neighbor of that source
//! (an optional weight is ignored). Vertex names are interned in order of
//! first appearance.

use std::io::{BufRead, ErrorKind, Result, Write};

use super::ncol::{NameInterner, vertex_label};
use super::*;
use crate::prelude::*;

/// A [`GraphReader`] for the LGL format.
#[derive(Debug, Clone, Default)]
pub struct LglReader {}

impl LglReader {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }
}

impl GraphReader for LglReader {
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<LoadedGraph> {
        let mut interner = NameInterner::new();
        let mut edges: Vec<Edge> = Vec::new();
        let mut source: Option<Node> = None;

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(name) = trimmed.strip_prefix('#') {
                let name = name.trim();
                raise_error_unless!(
                    !name.is_empty(),
                    ErrorKind::InvalidData,
                    "Empty source name in LGL input."
                );
                source = Some(interner.intern(name));
            } else {
                let u = source;
                raise_error_unless!(
                    u.is_some(),
                    ErrorKind::InvalidData,
                    "Neighbor line before the first '# source' line."
                );
                let name = trimmed.split_whitespace().next().unwrap();
                let v = interner.intern(name);
                edges.push(Edge(u.unwrap(), v));
            }
        }

        Ok(LoadedGraph {
            graph: DiGraph::from_edges(interner.len(), edges),
            names: Some(interner.into_names()),
        })
    }
}

/// A writer for the LGL format.
#[derive(Debug, Clone, Default)]
pub struct LglWriter<'a> {
    names: Option<&'a [String]>,
}

impl<'a> LglWriter<'a> {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders vertices through the given names instead of their indices.
    pub fn names(mut self, names: Option<&'a [String]>) -> Self {
        self.names = names;
        self
    }
}

impl<'a> GraphWriter for LglWriter<'a> {
    fn try_write_graph<W: Write>(&self, graph: &DiGraph, mut writer: W) -> Result<()> {
        for u in graph.vertices() {
            if graph.degree_of(u) == 0 {
                continue;
            }

            writeln!(writer, "# {}", vertex_label(u, self.names))?;
            for v in graph.neighbors_of(u) {
                writeln!(writer, "{}", vertex_label(v, self.names))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn blocks_define_edges() {
        let input = "# a\nb\nc\n# b\nc\n";
        let loaded = LglReader::new().try_read_graph(input.as_bytes()).unwrap();

        assert_eq!(loaded.graph.number_of_nodes(), 3);
        assert_eq!(
            loaded.graph.edges().collect_vec(),
            vec![Edge(0, 1), Edge(0, 2), Edge(1, 2)]
        );
        assert_eq!(
            loaded.names.unwrap(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn neighbor_without_source_is_an_error() {
        assert!(LglReader::new().try_read_graph("b\n".as_bytes()).is_err());
    }

    #[test]
    fn round_trip() {
        let graph = DiGraph::from_edges(3, [(0, 1), (0, 2), (1, 2)]);

        let mut buffer = Vec::new();
        LglWriter::new().try_write_graph(&graph, &mut buffer).unwrap();

        let loaded = LglReader::new().try_read_graph(buffer.as_slice()).unwrap();
        assert_eq!(
            loaded.graph.edges().collect_vec(),
            graph.edges().collect_vec()
        );
    }
}
