mod dataflow;
mod flow;
mod interference;
mod liveness;
mod spill;

pub use flow::FlowGraph;
pub use interference::{InterferenceGraph, Move};
pub use liveness::Liveness;
pub use spill::SpillCostModel;
