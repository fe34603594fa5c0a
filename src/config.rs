use serde::{Deserialize, Serialize};

use crate::analysis::SpillCostModel;

/// How the liveness fixpoint is evaluated. Both produce the same tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LivenessSolver {
    /// Full passes over every node until one pass changes nothing.
    RoundRobin,
    /// Only revisit nodes whose successors' live-in sets changed.
    #[default]
    Worklist,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub solver: LivenessSolver,
    pub spill_cost: SpillCostModel,
}
