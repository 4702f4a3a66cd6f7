//! # GML
//!
//! The Graph Modelling Language: nested `key value` blocks, with a
//! top-level `graph [ ... ]` block containing `node [ id ... ]` and
//! `edge [ source ... target ... ]` entries. Unknown keys are skipped, so
//! annotated output written by this tool can be read back in.

use std::io::{BufRead, ErrorKind, Read, Result, Write};

use fxhash::FxHashMap;

use super::ncol::vertex_label;
use super::*;
use crate::prelude::*;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open,
    Close,
    Word(String),
    Str(String),
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '[' => {
                tokens.push(Token::Open);
                chars.next();
            }
            ']' => {
                tokens.push(Token::Close);
                chars.next();
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(other) => value.push(other),
                        None => {
                            return Err(io_error!(
                                ErrorKind::InvalidData,
                                "Unterminated string in GML input."
                            ));
                        }
                    }
                }
                tokens.push(Token::Str(value));
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '[' || c == ']' || c == '"' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }

    Ok(tokens)
}

/// A [`GraphReader`] for the GML format.
#[derive(Debug, Clone, Default)]
pub struct GmlReader {}

impl GmlReader {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    ids: FxHashMap<i64, Node>,
    labels: Vec<Option<String>>,
    edges: Vec<(i64, i64)>,
}

impl Parser {
    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    /// Consumes the value following a key: a scalar word/string or a
    /// nested block.
    fn skip_value(&mut self) -> Result<()> {
        match self.next() {
            Some(Token::Open) => {
                let mut depth = 1;
                while depth > 0 {
                    match self.next() {
                        Some(Token::Open) => depth += 1,
                        Some(Token::Close) => depth -= 1,
                        Some(_) => {}
                        None => {
                            return Err(io_error!(
                                ErrorKind::InvalidData,
                                "Unterminated block in GML input."
                            ));
                        }
                    }
                }
                Ok(())
            }
            Some(_) => Ok(()),
            None => Err(io_error!(
                ErrorKind::InvalidData,
                "Missing value in GML input."
            )),
        }
    }

    fn expect_open(&mut self) -> Result<()> {
        raise_error_unless!(
            self.next() == Some(Token::Open),
            ErrorKind::InvalidData,
            "Expected '[' in GML input."
        );
        Ok(())
    }

    fn expect_int(&mut self) -> Result<i64> {
        match self.next() {
            Some(Token::Word(w)) => w.parse().map_err(|_| {
                io_error!(
                    ErrorKind::InvalidData,
                    format!("Expected an integer in GML input, found '{w}'.")
                )
            }),
            _ => Err(io_error!(
                ErrorKind::InvalidData,
                "Expected an integer in GML input."
            )),
        }
    }

    fn node_of(&mut self, id: i64) -> Node {
        if let Some(&u) = self.ids.get(&id) {
            return u;
        }
        let u = self.labels.len() as Node;
        self.ids.insert(id, u);
        self.labels.push(None);
        u
    }

    fn parse_node(&mut self) -> Result<()> {
        self.expect_open()?;
        let mut id = None;
        let mut label = None;

        loop {
            match self.next() {
                Some(Token::Close) => break,
                Some(Token::Word(key)) => match key.as_str() {
                    "id" => id = Some(self.expect_int()?),
                    "label" => match self.next() {
                        Some(Token::Str(s)) => label = Some(s),
                        Some(Token::Word(w)) => label = Some(w),
                        _ => {
                            return Err(io_error!(
                                ErrorKind::InvalidData,
                                "Missing label value in GML input."
                            ));
                        }
                    },
                    _ => self.skip_value()?,
                },
                _ => {
                    return Err(io_error!(
                        ErrorKind::InvalidData,
                        "Malformed node block in GML input."
                    ));
                }
            }
        }

        let id = id.ok_or(io_error!(
            ErrorKind::InvalidData,
            "Node block without id in GML input."
        ))?;
        let u = self.node_of(id);
        self.labels[u as usize] = label;
        Ok(())
    }

    fn parse_edge(&mut self) -> Result<()> {
        self.expect_open()?;
        let mut source = None;
        let mut target = None;

        loop {
            match self.next() {
                Some(Token::Close) => break,
                Some(Token::Word(key)) => match key.as_str() {
                    "source" => source = Some(self.expect_int()?),
                    "target" => target = Some(self.expect_int()?),
                    _ => self.skip_value()?,
                },
                _ => {
                    return Err(io_error!(
                        ErrorKind::InvalidData,
                        "Malformed edge block in GML input."
                    ));
                }
            }
        }

        match (source, target) {
            (Some(s), Some(t)) => {
                self.edges.push((s, t));
                Ok(())
            }
            _ => Err(io_error!(
                ErrorKind::InvalidData,
                "Edge block without source or target in GML input."
            )),
        }
    }

    fn parse_graph(&mut self) -> Result<()> {
        self.expect_open()?;
        loop {
            match self.next() {
                Some(Token::Close) => return Ok(()),
                Some(Token::Word(key)) => match key.as_str() {
                    "node" => self.parse_node()?,
                    "edge" => self.parse_edge()?,
                    _ => self.skip_value()?,
                },
                _ => {
                    return Err(io_error!(
                        ErrorKind::InvalidData,
                        "Malformed graph block in GML input."
                    ));
                }
            }
        }
    }
}

impl GraphReader for GmlReader {
    fn try_read_graph<R: BufRead>(&self, mut reader: R) -> Result<LoadedGraph> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;

        let mut parser = Parser {
            tokens: tokenize(&input)?,
            pos: 0,
            ids: FxHashMap::default(),
            labels: Vec::new(),
            edges: Vec::new(),
        };

        let mut found_graph = false;
        while let Some(token) = parser.next() {
            match token {
                Token::Word(key) if key == "graph" => {
                    parser.parse_graph()?;
                    found_graph = true;
                    break;
                }
                Token::Word(_) => parser.skip_value()?,
                _ => {
                    return Err(io_error!(
                        ErrorKind::InvalidData,
                        "Malformed GML input."
                    ));
                }
            }
        }
        raise_error_unless!(
            found_graph,
            ErrorKind::InvalidData,
            "No graph block found in GML input."
        );

        let edges: Vec<Edge> = parser
            .edges
            .clone()
            .into_iter()
            .map(|(s, t)| Edge(parser.node_of(s), parser.node_of(t)))
            .collect();

        let has_labels = parser.labels.iter().any(|l| l.is_some());
        let ids = parser.ids;
        let names = has_labels.then(|| {
            let mut id_of_node = vec![0i64; parser.labels.len()];
            for (&id, &u) in &ids {
                id_of_node[u as usize] = id;
            }
            parser
                .labels
                .into_iter()
                .enumerate()
                .map(|(u, label)| label.unwrap_or_else(|| id_of_node[u].to_string()))
                .collect()
        });

        Ok(LoadedGraph {
            graph: DiGraph::from_edges(ids.len() as NumNodes, edges),
            names,
        })
    }
}

/// A writer for the GML format, optionally attaching vertex names and
/// analysis annotations.
#[derive(Debug, Clone, Default)]
pub struct GmlWriter<'a> {
    names: Option<&'a [String]>,
    annotations: Option<&'a GraphAnnotations>,
}

impl<'a> GmlWriter<'a> {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches vertex names, written as node labels.
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

fn gml_escape(s: &str) -> String {
    s.replace('"', "'")
}

impl<'a> GraphWriter for GmlWriter<'a> {
    fn try_write_graph<W: Write>(&self, graph: &DiGraph, mut writer: W) -> Result<()> {
        writeln!(writer, "graph [")?;
        writeln!(writer, "  directed 1")?;

        for u in graph.vertices() {
            writeln!(writer, "  node [")?;
            writeln!(writer, "    id {u}")?;
            if self.names.is_some() {
                writeln!(
                    writer,
                    "    label \"{}\"",
                    gml_escape(&vertex_label(u, self.names))
                )?;
            }
            if let Some(annotations) = self.annotations {
                writeln!(
                    writer,
                    "    is_driver {}",
                    annotations.is_driver[u as usize] as u8
                )?;
            }
            writeln!(writer, "  ]")?;
        }

        for (e, Edge(u, v)) in graph.edges().enumerate() {
            writeln!(writer, "  edge [")?;
            writeln!(writer, "    source {u}")?;
            writeln!(writer, "    target {v}")?;
            if let Some(annotations) = self.annotations {
                if let Some(path_type) = annotations.path_type[e] {
                    writeln!(writer, "    path_type \"{path_type}\"")?;
                }
                if let Some(path_index) = annotations.path_indices[e] {
                    writeln!(writer, "    path_indices {path_index}")?;
                }
                if let Some(path_order) = annotations.path_order[e] {
                    writeln!(writer, "    path_order {path_order}")?;
                }
                if let Some(edge_class) = annotations.edge_class[e] {
                    writeln!(writer, "    edge_class \"{edge_class}\"")?;
                }
            }
            writeln!(writer, "  ]")?;
        }

        writeln!(writer, "]")?;
        Ok(())
    }
}
