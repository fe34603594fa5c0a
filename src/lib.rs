//! Register-allocation support for a compiler backend.
//!
//! A linear instruction body is turned into a [`FlowGraph`] (one node per
//! instruction), [`Liveness`] is solved over it, and the two together produce an
//! [`InterferenceGraph`] plus the move list a graph-coloring allocator coalesces.

pub mod analysis;
pub mod assem;
pub mod config;
pub mod error;
pub mod frame;
pub mod graph;
pub mod temp;

pub use analysis::{FlowGraph, InterferenceGraph, Liveness, Move, SpillCostModel};
pub use config::{AnalysisConfig, LivenessSolver};
pub use error::{AnalysisError, Result};
