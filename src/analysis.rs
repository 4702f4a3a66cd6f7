/*!
# Analysis Orchestrator

Dispatches one controllability analysis over a loaded graph: select a model
([`Model::Liu`] or [`Model::Switchboard`]) and an output mode
([`AnalysisMode`]), then [`Analysis::run`] writes the result to any
[`Write`] sink.

The five modes mirror the tool's CLI surface:

- `DriverNodes` — one driver vertex per line (names when available).
- `ControlPaths` — one textual control path per line.
- `Statistics` — counts and fractions of drivers and edge classes.
- `Significance` — observed controllability next to three null models.
- `Graph` — the input graph annotated with the results, in GraphML or GML.
*/

use std::io::Write;

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use thiserror::Error;
use tracing::info;

use crate::errors::{self, ControllabilityError};
use crate::io::ncol::vertex_label;
use crate::io::{FileFormat, GraphAnnotations, write_graph};
use crate::model::liu::LiuModel;
use crate::model::significance::NullModelAnalysis;
use crate::model::switchboard::{ControllabilityMeasure, SwitchboardModel};
use crate::model::{ControllabilityModel, EdgeClass};
use crate::prelude::*;

/// The dynamical model under which controllability is analyzed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Model {
    #[default]
    Liu,
    Switchboard,
}

/// The output computed by [`Analysis::run`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    #[default]
    DriverNodes,
    ControlPaths,
    Statistics,
    Significance,
    Graph,
}

/// Errors of the analysis layer: either the solver refused an operation or
/// writing the output failed.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Controllability(#[from] ControllabilityError),
}

/// One configured analysis over a borrowed graph.
pub struct Analysis<'a> {
    graph: &'a DiGraph,
    names: Option<&'a [String]>,
    model: Model,
    measure: ControllabilityMeasure,
    graph_output_format: FileFormat,
    seed: u64,
}

impl<'a> Analysis<'a> {
    /// Creates an analysis of the given graph with the Liu model, the
    /// node-based measure and GraphML output for the `Graph` mode.
    pub fn new(graph: &'a DiGraph) -> Self {
        Self {
            graph,
            names: None,
            model: Model::Liu,
            measure: ControllabilityMeasure::NodeMeasure,
            graph_output_format: FileFormat::GraphMl,
            seed: 0,
        }
    }

    /// Attaches vertex names used for all textual output.
    pub fn names(mut self, names: Option<&'a [String]>) -> Self {
        self.names = names;
        self
    }

    /// Selects the dynamical model.
    pub fn model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Selects the controllability measure of the switchboard model.
    pub fn measure(mut self, measure: ControllabilityMeasure) -> Self {
        self.measure = measure;
        self
    }

    /// Selects the file format of the annotated `Graph` output.
    pub fn graph_output_format(mut self, format: FileFormat) -> Self {
        self.graph_output_format = format;
        self
    }

    /// Seeds the PRNG driving the significance trials.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Runs the analysis in the given mode, writing results to `out`.
    pub fn run<W>(&self, mode: AnalysisMode, out: W) -> Result<(), AnalysisError>
    where
        W: Write,
    {
        match self.model {
            Model::Liu => self.run_with(
                LiuModel::new(self.graph),
                |g| {
                    let mut model = LiuModel::new(g);
                    model.calculate()?;
                    Ok(model.controllability())
                },
                mode,
                out,
            ),
            Model::Switchboard => {
                let measure = self.measure;
                self.run_with(
                    SwitchboardModel::new(self.graph).with_measure(measure),
                    move |g| {
                        let mut model = SwitchboardModel::new(g).with_measure(measure);
                        model.calculate()?;
                        Ok(model.controllability())
                    },
                    mode,
                    out,
                )
            }
        }
    }

    fn run_with<M, F, W>(
        &self,
        mut model: M,
        solve: F,
        mode: AnalysisMode,
        mut out: W,
    ) -> Result<(), AnalysisError>
    where
        M: ControllabilityModel,
        F: FnMut(&DiGraph) -> errors::Result<f64>,
        W: Write,
    {
        info!("calculating control paths and driver nodes");
        model.calculate()?;

        match mode {
            AnalysisMode::DriverNodes => {
                info!("found {} driver node(s)", model.driver_nodes().len());
                for &driver in model.driver_nodes() {
                    writeln!(out, "{}", vertex_label(driver, self.names))?;
                }
            }

            AnalysisMode::ControlPaths => {
                info!("found {} control path(s)", model.control_paths().len());
                for path in model.control_paths() {
                    writeln!(out, "{}", path.to_text(model.control_paths(), self.names))?;
                }
            }

            AnalysisMode::Statistics => {
                info!("classifying edges");
                let classes = model.edge_classes()?;

                let count_of = |class: EdgeClass| -> usize {
                    classes.iter().filter(|&&c| c == class).count()
                };
                let num_driver = model.driver_nodes().len();
                let num_distinguished = count_of(EdgeClass::Distinguished);
                let num_redundant = count_of(EdgeClass::Redundant);
                let num_ordinary = count_of(EdgeClass::Ordinary);
                let num_critical = count_of(EdgeClass::Critical);

                let n = self.graph.number_of_nodes() as f64;
                let m = self.graph.number_of_edges() as f64;

                writeln!(
                    out,
                    "{num_driver} {num_distinguished} {num_redundant} {num_ordinary} {num_critical}"
                )?;
                writeln!(
                    out,
                    "{} {} {} {} {}",
                    num_driver as f64 / n,
                    num_distinguished as f64 / m,
                    num_redundant as f64 / m,
                    num_ordinary as f64 / m,
                    num_critical as f64 / m
                )?;
            }

            AnalysisMode::Significance => {
                info!("found {} driver node(s)", model.driver_nodes().len());
                let rng = &mut Pcg64Mcg::seed_from_u64(self.seed);
                let report = NullModelAnalysis::new(self.graph).run(
                    rng,
                    model.controllability(),
                    solve,
                )?;

                for (label, value) in report.rows() {
                    writeln!(out, "{label}\t{value}")?;
                }
            }

            AnalysisMode::Graph => {
                info!("classifying edges");
                let annotations = self.annotate(&model)?;
                write_graph(
                    self.graph,
                    self.names,
                    Some(&annotations),
                    &mut out,
                    self.graph_output_format,
                )?;
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Collects the model's results into per-node and per-edge attributes.
    fn annotate<M>(&self, model: &M) -> Result<GraphAnnotations, AnalysisError>
    where
        M: ControllabilityModel,
    {
        let n = self.graph.number_of_nodes() as usize;
        let m = self.graph.number_of_edges() as usize;

        let mut annotations = GraphAnnotations {
            is_driver: vec![false; n],
            path_type: vec![None; m],
            path_indices: vec![None; m],
            path_order: vec![None; m],
            edge_class: vec![None; m],
        };

        for &driver in model.driver_nodes() {
            annotations.is_driver[driver as usize] = true;
        }

        for (path_index, path) in model.control_paths().iter().enumerate() {
            for (path_order, e) in path.edges(self.graph).into_iter().enumerate() {
                annotations.path_type[e as usize] = Some(path.name());
                annotations.path_indices[e as usize] = Some(path_index);
                annotations.path_order[e as usize] = Some(path_order);
            }
        }

        for (e, class) in model.edge_classes()?.into_iter().enumerate() {
            annotations.edge_class[e] = Some(class.as_str());
        }

        Ok(annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_string(analysis: &Analysis<'_>, mode: AnalysisMode) -> String {
        let mut buffer = Vec::new();
        analysis.run(mode, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn driver_nodes_mode_lists_drivers() {
        let graph = DiGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let analysis = Analysis::new(&graph);

        assert_eq!(run_to_string(&analysis, AnalysisMode::DriverNodes), "0\n");
    }

    #[test]
    fn driver_nodes_mode_uses_names() {
        let graph = DiGraph::from_edges(2, [(0, 1)]);
        let names = vec!["alice".to_string(), "bob".to_string()];
        let analysis = Analysis::new(&graph).names(Some(&names));

        assert_eq!(
            run_to_string(&analysis, AnalysisMode::DriverNodes),
            "alice\n"
        );
    }

    #[test]
    fn control_paths_mode_prints_textual_paths() {
        let graph = DiGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let analysis = Analysis::new(&graph);

        assert_eq!(
            run_to_string(&analysis, AnalysisMode::ControlPaths),
            "Stem: 0 1 2 3\n"
        );
    }

    #[test]
    fn statistics_mode_prints_counts_and_fractions() {
        let graph = DiGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let analysis = Analysis::new(&graph);

        assert_eq!(
            run_to_string(&analysis, AnalysisMode::Statistics),
            "1 0 0 0 3\n0.25 0 0 0 1\n"
        );
    }

    #[test]
    fn switchboard_statistics_use_the_degree_classifier() {
        let graph = DiGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let analysis = Analysis::new(&graph).model(Model::Switchboard);

        assert_eq!(
            run_to_string(&analysis, AnalysisMode::Statistics),
            "1 0 2 0 1\n0.25 0 0.6666666666666666 0 0.3333333333333333\n"
        );
    }

    #[test]
    fn significance_mode_prints_labeled_rows() {
        let graph = DiGraph::new(5);
        let analysis = Analysis::new(&graph).seed(42);

        let output = run_to_string(&analysis, AnalysisMode::Significance);
        assert_eq!(
            output,
            "Observed\t1\nER\t1\nConfiguration\t1\nConfiguration_no_joint\t1\n"
        );
    }

    #[test]
    fn graph_mode_emits_annotated_graphml() {
        let graph = DiGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let analysis = Analysis::new(&graph);

        let output = run_to_string(&analysis, AnalysisMode::Graph);
        assert!(output.contains("<graphml"));
        assert!(output.contains(r#"<data key="is_driver">1</data>"#));
        assert!(output.contains(r#"<data key="path_type">stem</data>"#));
        assert!(output.contains(r#"<data key="edge_class">critical</data>"#));
    }

    #[test]
    fn graph_mode_can_emit_gml() {
        let graph = DiGraph::from_edges(2, [(0, 1)]);
        let analysis = Analysis::new(&graph).graph_output_format(FileFormat::Gml);

        let output = run_to_string(&analysis, AnalysisMode::Graph);
        assert!(output.starts_with("graph ["));
        assert!(output.contains("is_driver 1"));
    }
}
