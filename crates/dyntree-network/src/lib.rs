//! Branch network walking and the node inspectors that ride on it.
#![forbid(unsafe_code)]

pub mod aging;
pub mod coder;
pub mod collector;
pub mod destroyer;
pub mod find_ends;
pub mod inflator;
pub mod leaf_clusters;
pub mod leaves;
pub mod rot;
pub mod signal;
pub mod tree;

pub use aging::age_volume;
pub use coder::CoderNode;
pub use collector::CollectorNode;
pub use destroyer::{NodeDestroyer, fell_tree};
pub use find_ends::FindEndsNode;
pub use inflator::NodeInflator;
pub use leaves::{CellSolver, LeavesProperties, SolverRule};
pub use signal::{MapSignal, NodeInspector, analyse, analyse_branch};
pub use tree::Family;
