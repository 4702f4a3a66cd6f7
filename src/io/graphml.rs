//! # GraphML
//!
//! Write-only support for the GraphML XML format. Attribute keys are
//! declared up front and only emitted when names or annotations are
//! attached, so a bare graph serializes without any `<key>` clutter.

use std::io::{Result, Write};

use super::ncol::vertex_label;
use super::*;
use crate::prelude::*;

/// A writer for the GraphML format, optionally attaching vertex names and
/// analysis annotations.
#[derive(Debug, Clone, Default)]
pub struct GraphMlWriter<'a> {
    names: Option<&'a [String]>,
    annotations: Option<&'a GraphAnnotations>,
}

impl<'a> GraphMlWriter<'a> {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches vertex names, written as a `name` node attribute.
    pub fn names(mut self, names: Option<&'a [String]>) -> Self {
        self.names = names;
        self
    }

    /// Attaches analysis annotations, written as node and edge attributes.
    pub fn annotations(mut self, annotations: Option<&'a GraphAnnotations>) -> Self {
        self.annotations = annotations;
        self
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl<'a> GraphWriter for GraphMlWriter<'a> {
    fn try_write_graph<W: Write>(&self, graph: &DiGraph, mut writer: W) -> Result<()> {
        writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            writer,
            r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns">"#
        )?;

        if self.names.is_some() {
            writeln!(
                writer,
                r#"  <key id="name" for="node" attr.name="name" attr.type="string"/>"#
            )?;
        }
        if self.annotations.is_some() {
            writeln!(
                writer,
                r#"  <key id="is_driver" for="node" attr.name="is_driver" attr.type="boolean"/>"#
            )?;
            writeln!(
                writer,
                r#"  <key id="path_type" for="edge" attr.name="path_type" attr.type="string"/>"#
            )?;
            writeln!(
                writer,
                r#"  <key id="path_indices" for="edge" attr.name="path_indices" attr.type="long"/>"#
            )?;
            writeln!(
                writer,
                r#"  <key id="path_order" for="edge" attr.name="path_order" attr.type="long"/>"#
            )?;
            writeln!(
                writer,
                r#"  <key id="edge_class" for="edge" attr.name="edge_class" attr.type="string"/>"#
            )?;
        }

        writeln!(writer, r#"  <graph id="G" edgedefault="directed">"#)?;

        for u in graph.vertices() {
            let mut data = String::new();
            if self.names.is_some() {
                data.push_str(&format!(
                    r#"<data key="name">{}</data>"#,
                    xml_escape(&vertex_label(u, self.names))
                ));
            }
            if let Some(annotations) = self.annotations {
                data.push_str(&format!(
                    r#"<data key="is_driver">{}</data>"#,
                    annotations.is_driver[u as usize] as u8
                ));
            }

            if data.is_empty() {
                writeln!(writer, r#"    <node id="n{u}"/>"#)?;
            } else {
                writeln!(writer, r#"    <node id="n{u}">{data}</node>"#)?;
            }
        }

        for (e, Edge(u, v)) in graph.edges().enumerate() {
            let mut data = String::new();
            if let Some(annotations) = self.annotations {
                if let Some(path_type) = annotations.path_type[e] {
                    data.push_str(&format!(r#"<data key="path_type">{path_type}</data>"#));
                }
                if let Some(path_index) = annotations.path_indices[e] {
                    data.push_str(&format!(r#"<data key="path_indices">{path_index}</data>"#));
                }
                if let Some(path_order) = annotations.path_order[e] {
                    data.push_str(&format!(r#"<data key="path_order">{path_order}</data>"#));
                }
                if let Some(edge_class) = annotations.edge_class[e] {
                    data.push_str(&format!(r#"<data key="edge_class">{edge_class}</data>"#));
                }
            }

            if data.is_empty() {
                writeln!(writer, r#"    <edge source="n{u}" target="n{v}"/>"#)?;
            } else {
                writeln!(
                    writer,
                    r#"    <edge source="n{u}" target="n{v}">{data}</edge>"#
                )?;
            }
        }

        writeln!(writer, "  </graph>")?;
        writeln!(writer, "</graphml>")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_wellformed_annotated_output() {
        let graph = DiGraph::from_edges(2, [(0, 1)]);
        let names = vec!["a<b".to_string(), "b".to_string()];
        let annotations = GraphAnnotations {
            is_driver: vec![true, false],
            path_type: vec![Some("stem")],
            path_indices: vec![Some(0)],
            path_order: vec![Some(0)],
            edge_class: vec![Some("critical")],
        };

        let mut buffer = Vec::new();
        GraphMlWriter::new()
            .names(Some(&names))
            .annotations(Some(&annotations))
            .try_write_graph(&graph, &mut buffer)
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains(r#"<data key="name">a&lt;b</data>"#));
        assert!(output.contains(r#"<data key="is_driver">1</data>"#));
        assert!(output.contains(r#"<edge source="n0" target="n1">"#));
        assert!(output.contains(r#"<data key="edge_class">critical</data>"#));
    }

    #[test]
    fn reading_graphml_is_not_supported() {
        let err = read_graph("<graphml/>".as_bytes(), FileFormat::GraphMl).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::Unsupported);
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn bare_graph_has_no_keys() {
        let graph = DiGraph::from_edges(2, [(0, 1)]);

        let mut buffer = Vec::new();
        GraphMlWriter::new().try_write_graph(&graph, &mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(!output.contains("<key"));
        assert!(output.contains(r#"<node id="n0"/>"#));
    }
}
