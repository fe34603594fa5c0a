use std::fmt::Display;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_GRAPH: AtomicU32 = AtomicU32::new(0);

/// Tags node handles with the graph that created them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct GraphId(u32);

impl GraphId {
    pub(crate) fn fresh() -> Self {
        GraphId(NEXT_GRAPH.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable handle to a node. Only meaningful for the graph that handed it out
/// (and clones of that graph).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) graph: GraphId,
    pub(crate) index: u32,
}

impl NodeId {
    /// Creation order within the owning graph. Used for display only.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<P> {
    pub(crate) payload: P,
    pub(crate) succs: Vec<NodeId>,
    pub(crate) preds: Vec<NodeId>,
}

impl<P> Node<P> {
    pub(crate) fn new(payload: P) -> Self {
        Node {
            payload,
            succs: Vec::new(),
            preds: Vec::new(),
        }
    }
}
