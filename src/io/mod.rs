/*!
# IO

Utilities for reading and writing graphs from and to different file formats.

## Input Formats

- **EdgeList**: zero-based `u v` integer pairs, one edge per line.
- **NCOL**: `nameA nameB [weight]` lines; names are interned in order of
  first appearance.
- **LGL**: `# source` header lines followed by one neighbor per line.
- **GML**: `graph [ node [...] edge [...] ]` key-value blocks.

## Output Formats

All input formats can be written back; additionally **GraphML** is
write-only. The GraphML and GML writers can attach the analysis results as
node and edge attributes (see [`GraphAnnotations`]), which is how the
`graph` output mode emits its annotated network.

The file format is inferred from the file extension (`.txt`, `.ncol`,
`.lgl`, `.graphml`, `.gml`) and can be overridden explicitly.
*/

pub mod edge_list;
pub mod gml;
pub mod graphml;
pub mod lgl;
pub mod ncol;

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, ErrorKind, Result, Write},
    path::Path,
    str::FromStr,
};

use crate::errors::ControllabilityError;
use crate::repr::DiGraph;

pub use edge_list::*;
pub use gml::*;
pub use graphml::*;
pub use lgl::*;
pub use ncol::*;

/// Identifier for a graph file format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Zero-based edge list
    EdgeList,
    /// Large Graph Layout NCOL format
    Ncol,
    /// Large Graph Layout LGL format
    Lgl,
    /// GraphML (XML), write-only
    GraphMl,
    /// Graph Modelling Language
    Gml,
}

impl FromStr for FileFormat {
    type Err = std::io::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "edgelist" => Ok(FileFormat::EdgeList),
            "ncol" => Ok(FileFormat::Ncol),
            "lgl" => Ok(FileFormat::Lgl),
            "graphml" => Ok(FileFormat::GraphMl),
            "gml" => Ok(FileFormat::Gml),
            _ => Err(io_error!(
                ErrorKind::InvalidInput,
                format!("Unknown file format: {s}")
            )),
        }
    }
}

impl FileFormat {
    /// Infers the format from the extension of a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match extension.to_lowercase().as_str() {
            "txt" => Ok(FileFormat::EdgeList),
            "ncol" => Ok(FileFormat::Ncol),
            "lgl" => Ok(FileFormat::Lgl),
            "graphml" => Ok(FileFormat::GraphMl),
            "gml" => Ok(FileFormat::Gml),
            _ => Err(io_error!(
                ErrorKind::InvalidInput,
                format!(
                    "Cannot infer graph format from file name: {}",
                    path.as_ref().display()
                )
            )),
        }
    }
}

/// A graph together with the vertex names its source file carried, if any.
pub struct LoadedGraph {
    pub graph: DiGraph,
    pub names: Option<Vec<String>>,
}

/// Analysis results attached to a graph when writing annotated output.
///
/// All vectors are indexed by node or edge index; `None` entries are
/// omitted from the output.
#[derive(Debug, Clone, Default)]
pub struct GraphAnnotations {
    /// One entry per node.
    pub is_driver: Vec<bool>,
    /// One entry per edge: name of the control-path type covering it.
    pub path_type: Vec<Option<&'static str>>,
    /// One entry per edge: index of the path within the solver's path list.
    pub path_indices: Vec<Option<usize>>,
    /// One entry per edge: 0-based position within the path.
    pub path_order: Vec<Option<usize>>,
    /// One entry per edge: name of the edge class.
    pub edge_class: Vec<Option<&'static str>>,
}

/// Trait for types that can read graphs in a specific format.
pub trait GraphReader {
    /// Reads a graph from the given reader according to the settings in
    /// `self`.
    ///
    /// # Errors
    /// Returns an error if the input is not a valid representation of a
    /// graph in the expected format.
    fn try_read_graph<R>(&self, reader: R) -> Result<LoadedGraph>
    where
        R: BufRead;

    /// Reads a graph from a file according to the settings in `self`.
    fn try_read_graph_file<P>(&self, path: P) -> Result<LoadedGraph>
    where
        P: AsRef<Path>,
    {
        self.try_read_graph(BufReader::new(File::open(path)?))
    }
}

/// Trait for types that can write graphs in a specific format.
pub trait GraphWriter {
    /// Writes the given graph to the provided writer according to the
    /// settings in `self`.
    fn try_write_graph<W>(&self, graph: &DiGraph, writer: W) -> Result<()>
    where
        W: Write;

    /// Writes the given graph to a file according to the settings in
    /// `self`.
    fn try_write_graph_file<P>(&self, graph: &DiGraph, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        self.try_write_graph(graph, BufWriter::new(File::create(path)?))
    }
}

/// Reads a graph in the given format from any buffered reader.
pub fn read_graph<R>(reader: R, format: FileFormat) -> Result<LoadedGraph>
where
    R: BufRead,
{
    match format {
        FileFormat::EdgeList => EdgeListReader::new().try_read_graph(reader),
        FileFormat::Ncol => NcolReader::new().try_read_graph(reader),
        FileFormat::Lgl => LglReader::new().try_read_graph(reader),
        FileFormat::Gml => GmlReader::new().try_read_graph(reader),
        FileFormat::GraphMl => Err(io_error!(
            ErrorKind::Unsupported,
            ControllabilityError::NotSupported("reading GraphML input")
        )),
    }
}

/// Reads a graph from a file, inferring the format from the extension
/// unless one is given.
pub fn read_graph_file<P>(path: P, format: Option<FileFormat>) -> Result<LoadedGraph>
where
    P: AsRef<Path>,
{
    let format = match format {
        Some(f) => f,
        None => FileFormat::from_path(&path)?,
    };
    read_graph(BufReader::new(File::open(path)?), format)
}

/// Writes a graph in the given format, attaching names and annotations
/// where the format supports them.
pub fn write_graph<W>(
    graph: &DiGraph,
    names: Option<&[String]>,
    annotations: Option<&GraphAnnotations>,
    writer: W,
    format: FileFormat,
) -> Result<()>
where
    W: Write,
{
    match format {
        FileFormat::EdgeList => EdgeListWriter::new().try_write_graph(graph, writer),
        FileFormat::Ncol => NcolWriter::new().names(names).try_write_graph(graph, writer),
        FileFormat::Lgl => LglWriter::new().names(names).try_write_graph(graph, writer),
        FileFormat::Gml => GmlWriter::new()
            .names(names)
            .annotations(annotations)
            .try_write_graph(graph, writer),
        FileFormat::GraphMl => GraphMlWriter::new()
            .names(names)
            .annotations(annotations)
            .try_write_graph(graph, writer),
    }
}

/// Shorthand for creating a new IO-error
macro_rules! io_error {
    ($kind: expr, $info: expr) => {
        std::io::Error::new($kind, $info)
    };
}

/// Shorthand for returning `Err(std::io::Error)` early when a condition fails
macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(io_error!($kind, $info));
        }
    };
}

/// Tries to parse the next value in an iterator and returns early if it fails
macro_rules! parse_next_value {
    ($iterator : expr, $name : expr) => {{
        let next = $iterator.next();
        raise_error_unless!(
            next.is_some(),
            ErrorKind::InvalidData,
            format!("Premature end of line when parsing {}.", $name)
        );

        let parsed = next.unwrap().parse();
        raise_error_unless!(
            parsed.is_ok(),
            ErrorKind::InvalidData,
            format!("Invalid value found. Cannot parse {}.", $name)
        );

        parsed.unwrap()
    }};
}

pub(crate) use io_error;
pub(crate) use parse_next_value;
pub(crate) use raise_error_unless;
