//! # NCOL
//!
//! The NCOL format of the Large Graph Layout suite: one edge per line as
//! `nameA nameB`, optionally followed by a weight (ignored here). Vertex
//! names are interned in order of first appearance.

use std::io::{BufRead, ErrorKind, Result, Write};

use fxhash::FxHashMap;

use super::*;
use crate::prelude::*;

/// A [`GraphReader`] for the NCOL format.
#[derive(Debug, Clone, Default)]
pub struct NcolReader {}

impl NcolReader {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }
}

/// Interns vertex names into consecutive node indices.
pub(crate) struct NameInterner {
    indices: FxHashMap<String, Node>,
    names: Vec<String>,
}

impl NameInterner {
    pub(crate) fn new() -> Self {
        Self {
            indices: FxHashMap::default(),
            names: Vec::new(),
        }
    }

    pub(crate) fn intern(&mut self, name: &str) -> Node {
        if let Some(&u) = self.indices.get(name) {
            return u;
        }
        let u = self.names.len() as Node;
        self.indices.insert(name.to_string(), u);
        self.names.push(name.to_string());
        u
    }

    pub(crate) fn into_names(self) -> Vec<String> {
        self.names
    }

    pub(crate) fn len(&self) -> NumNodes {
        self.names.len() as NumNodes
    }
}

impl GraphReader for NcolReader {
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<LoadedGraph> {
        let mut interner = NameInterner::new();
        let mut edges: Vec<Edge> = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let mut parts = line.split_whitespace();
            let from = parts.next();
            raise_error_unless!(
                from.is_some(),
                ErrorKind::InvalidData,
                "Premature end of line when parsing source name."
            );
            let to = parts.next();
            raise_error_unless!(
                to.is_some(),
                ErrorKind::InvalidData,
                "Premature end of line when parsing target name."
            );

            let u = interner.intern(from.unwrap());
            let v = interner.intern(to.unwrap());
            edges.push(Edge(u, v));
        }

        Ok(LoadedGraph {
            graph: DiGraph::from_edges(interner.len(), edges),
            names: Some(interner.into_names()),
        })
    }
}

/// A writer for the NCOL format.
#[derive(Debug, Clone, Default)]
pub struct NcolWriter<'a> {
    names: Option<&'a [String]>,
}

impl<'a> NcolWriter<'a> {
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

pub(crate) fn vertex_label(u: Node, names: Option<&[String]>) -> String {
    match names.and_then(|ns| ns.get(u as usize)) {
        Some(name) => name.clone(),
        None => u.to_string(),
    }
}

impl<'a> GraphWriter for NcolWriter<'a> {
    fn try_write_graph<W: Write>(&self, graph: &DiGraph, mut writer: W) -> Result<()> {
        for Edge(u, v) in graph.edges() {
            writeln!(
                writer,
                "{} {}",
                vertex_label(u, self.names),
                vertex_label(v, self.names)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn names_are_interned_in_first_seen_order() {
        let input = "alice bob\nbob carol 2.5\ncarol alice\n";
        let loaded = NcolReader::new().try_read_graph(input.as_bytes()).unwrap();

        assert_eq!(loaded.graph.number_of_nodes(), 3);
        assert_eq!(
            loaded.names.unwrap(),
            vec!["alice".to_string(), "bob".to_string(), "carol".to_string()]
        );
        assert_eq!(
            loaded.graph.edges().collect_vec(),
            vec![Edge(0, 1), Edge(1, 2), Edge(2, 0)]
        );
    }

    #[test]
    fn writer_uses_names_when_given() {
        let graph = DiGraph::from_edges(2, [(0, 1)]);
        let names = vec!["a".to_string(), "b".to_string()];

        let mut buffer = Vec::new();
        NcolWriter::new()
            .names(Some(&names))
            .try_write_graph(&graph, &mut buffer)
            .unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), "a b\n");
    }
}
