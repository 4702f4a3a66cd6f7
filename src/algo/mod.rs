//! Graph algorithms shared by the controllability solvers:
//! connected components (weak and strong) and maximum bipartite matching.

use crate::prelude::*;

pub mod connectivity;
pub mod matching;

pub use connectivity::*;
pub use matching::*;
