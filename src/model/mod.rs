/*!
# Controllability Models

The two dynamical models under which driver nodes are computed:

- [`liu::LiuModel`] — nodal dynamics of Liu et al., via maximum bipartite
  matching.
- [`switchboard::SwitchboardModel`] — switchboard (edge) dynamics, via
  per-vertex degree imbalance.

Both implement [`ControllabilityModel`], the surface the analysis layer
dispatches on. A model borrows its graph at construction, `calculate()`
replaces any previous result, and all result accessors return borrowed views
owned by the model.
*/

use crate::errors::Result;
use crate::node::Node;

pub mod liu;
pub mod matching;
pub mod paths;
pub mod significance;
pub mod switchboard;

pub use paths::ControlPath;

/// Classification of an edge with respect to the number of driver nodes its
/// removal would require.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EdgeClass {
    /// Neither critical nor redundant (Liu model only).
    Ordinary,
    /// Removal never changes the number of drivers.
    Redundant,
    /// Removal forces an additional driver in every control configuration.
    Critical,
    /// Removal *decreases* the number of drivers (switchboard model only).
    Distinguished,
}

impl EdgeClass {
    /// Returns the lowercase name used in annotated graph output.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeClass::Ordinary => "ordinary",
            EdgeClass::Redundant => "redundant",
            EdgeClass::Critical => "critical",
            EdgeClass::Distinguished => "distinguished",
        }
    }
}

/// Common surface of the controllability solvers.
///
/// A solver is constructed on a borrowed graph, stays attached to it for its
/// lifetime, and owns all results of the latest `calculate()` run.
pub trait ControllabilityModel {
    /// Computes the driver nodes and control paths for the attached graph,
    /// replacing any previous result.
    fn calculate(&mut self) -> Result<()>;

    /// Returns the controllability measure of the latest result
    /// (`0.0` for an empty graph).
    fn controllability(&self) -> f64;

    /// Returns the driver nodes of the latest result.
    fn driver_nodes(&self) -> &[Node];

    /// Returns the control paths of the latest result.
    fn control_paths(&self) -> &[ControlPath];

    /// Classifies every edge of the graph, in edge-index order.
    fn edge_classes(&self) -> Result<Vec<EdgeClass>>;
}
