use thiserror::Error;

use crate::graph::NodeId;
use crate::temp::{Label, Temp};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("instruction {at} jumps to `{label}`, which is not defined in this body")]
    UndefinedLabel { label: Label, at: usize },

    #[error("label `{label}` is defined at instruction {first} and again at {second}")]
    DuplicateLabel {
        label: Label,
        first: usize,
        second: usize,
    },

    #[error("node {0} does not belong to this graph")]
    NodeNotFound(NodeId),

    #[error("temporary `{0}` has no node in the interference graph")]
    TempNotFound(Temp),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
