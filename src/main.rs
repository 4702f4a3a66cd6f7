//! Command-line front-end of `ctrlgraphs`.
//!
//! Loads a directed network (from a file, standard input, or a generator
//! pseudo-URL), runs one controllability analysis and routes the result to
//! standard output or a file.
//!
//! Exit codes: `0` success, `1` analysis error, `2` graph load failure,
//! `3` output open failure.

use std::fs::File;
use std::io::{self, BufWriter};

use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ctrlgraphs::analysis::{Analysis, AnalysisMode, Model};
use ctrlgraphs::gens::RandomGraph;
use ctrlgraphs::io::{FileFormat, LoadedGraph, read_graph, read_graph_file};
use ctrlgraphs::model::switchboard::ControllabilityMeasure;
use ctrlgraphs::prelude::*;

/// Structural controllability analysis of directed complex networks
#[derive(Parser, Debug)]
#[command(name = "ctrlgraphs")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file, '-' for standard input, or a generator URL such as
    /// er://n,k[,directed]
    input: String,

    /// Dynamical model to analyze
    #[arg(short = 'm', long, value_enum, default_value = "liu")]
    model: ModelArg,

    /// Output to compute
    #[arg(short = 'M', long, value_enum, default_value = "driver_nodes")]
    mode: ModeArg,

    /// Output file ('-' for standard output)
    #[arg(short = 'o', long, default_value = "-")]
    output: String,

    /// Input format override (edgelist, ncol, lgl, gml)
    #[arg(short = 'f', long)]
    input_format: Option<String>,

    /// Output format override for the graph mode (graphml, gml)
    #[arg(short = 'F', long)]
    output_format: Option<String>,

    /// Use the edge-based controllability measure (switchboard model only)
    #[arg(long)]
    edge_measure: bool,

    /// Seed for generated graphs and significance trials
    #[arg(short = 's', long, default_value_t = 0)]
    seed: u64,

    /// Increase verbosity (repeat for debug output)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all diagnostics
    #[arg(short = 'q', long)]
    quiet: bool,
}

/// CLI spelling of the dynamical models.
#[derive(Debug, Clone, clap::ValueEnum)]
enum ModelArg {
    #[value(name = "liu")]
    Liu,
    #[value(name = "switchboard")]
    Switchboard,
}

impl From<ModelArg> for Model {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Liu => Model::Liu,
            ModelArg::Switchboard => Model::Switchboard,
        }
    }
}

/// CLI spelling of the output modes.
#[derive(Debug, Clone, clap::ValueEnum)]
enum ModeArg {
    #[value(name = "driver_nodes")]
    DriverNodes,
    #[value(name = "control_paths")]
    ControlPaths,
    #[value(name = "statistics")]
    Statistics,
    #[value(name = "significance")]
    Significance,
    #[value(name = "graph")]
    Graph,
}

impl From<ModeArg> for AnalysisMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::DriverNodes => AnalysisMode::DriverNodes,
            ModeArg::ControlPaths => AnalysisMode::ControlPaths,
            ModeArg::Statistics => AnalysisMode::Statistics,
            ModeArg::Significance => AnalysisMode::Significance,
            ModeArg::Graph => AnalysisMode::Graph,
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    std::process::exit(run(&args));
}

fn run(args: &Args) -> i32 {
    let input_format = match parse_format(args.input_format.as_deref()) {
        Ok(format) => format,
        Err(message) => {
            error!("{message}");
            return 1;
        }
    };

    info!("loading graph: {}", args.input);
    let loaded = match load_graph(args, input_format) {
        Ok(loaded) => loaded,
        Err(message) => {
            error!("cannot load graph: {message}");
            return 2;
        }
    };

    info!(
        "graph has {} vertices and {} edges",
        loaded.graph.number_of_nodes(),
        loaded.graph.number_of_edges()
    );

    let graph_output_format = match graph_output_format(args) {
        Ok(format) => format,
        Err(message) => {
            error!("{message}");
            return 1;
        }
    };

    let analysis = Analysis::new(&loaded.graph)
        .names(loaded.names.as_deref())
        .model(args.model.clone().into())
        .measure(if args.edge_measure {
            ControllabilityMeasure::EdgeMeasure
        } else {
            ControllabilityMeasure::NodeMeasure
        })
        .graph_output_format(graph_output_format)
        .seed(args.seed);

    let result = if args.output == "-" {
        analysis.run(args.mode.clone().into(), io::stdout().lock())
    } else {
        let file = match File::create(&args.output) {
            Ok(file) => file,
            Err(err) => {
                error!("cannot open output file for writing: {}: {err}", args.output);
                return 3;
            }
        };
        analysis.run(args.mode.clone().into(), BufWriter::new(file))
    };

    match result {
        Ok(()) => {
            if args.output != "-" {
                info!("results were written to {}", args.output);
            }
            0
        }
        Err(err) => {
            error!("{err}");
            1
        }
    }
}

fn parse_format(arg: Option<&str>) -> Result<Option<FileFormat>, String> {
    match arg {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|err: io::Error| err.to_string()),
    }
}

/// Determines the format of the annotated graph output: an explicit
/// override first, then the extension of the output path, GraphML as the
/// fallback.
fn graph_output_format(args: &Args) -> Result<FileFormat, String> {
    if let Some(format) = parse_format(args.output_format.as_deref())? {
        return match format {
            FileFormat::GraphMl | FileFormat::Gml => Ok(format),
            _ => Err("graph output supports only graphml and gml".to_string()),
        };
    }

    if args.output != "-" {
        if let Ok(format @ (FileFormat::GraphMl | FileFormat::Gml)) =
            FileFormat::from_path(&args.output)
        {
            return Ok(format);
        }
    }

    Ok(FileFormat::GraphMl)
}

fn load_graph(args: &Args, format: Option<FileFormat>) -> Result<LoadedGraph, String> {
    if args.input == "-" {
        let format = format.unwrap_or(FileFormat::EdgeList);
        return read_graph(io::stdin().lock(), format).map_err(|err| err.to_string());
    }

    if let Some(params) = args.input.strip_prefix("er://") {
        return generate_erdos_renyi(params, args.seed);
    }

    read_graph_file(&args.input, format).map_err(|err| err.to_string())
}

/// Generates an Erdős–Rényi graph from an `er://n,k[,directed]` URL, where
/// `k` is the average degree.
fn generate_erdos_renyi(params: &str, seed: u64) -> Result<LoadedGraph, String> {
    let parts: Vec<&str> = params.split(',').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(
            "the ER generator requires two or three arguments: number of nodes, \
             average degree and directedness (optional)"
                .to_string(),
        );
    }

    let n: NumNodes = parts[0]
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of nodes: {}", parts[0]))?;
    let k: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|_| format!("invalid average degree: {}", parts[1]))?;
    if parts.len() == 3 && parts[2].trim() != "1" {
        return Err("only directed graphs are supported".to_string());
    }

    let m = (n as f64 * k) as NumEdges;
    let rng = &mut Pcg64Mcg::seed_from_u64(seed);

    Ok(LoadedGraph {
        graph: DiGraph::gnm(rng, n, m),
        names: None,
    })
}
