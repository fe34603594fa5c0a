use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Deref;

use super::{Graph, NodeId};

/// A [`Graph`] that also maps each payload back to its node.
///
/// The index is maintained eagerly by every insertion and removal, so each payload
/// has at most one node. Read-only graph queries are available through `Deref`.
#[derive(Clone, Debug)]
pub struct KeyedGraph<P> {
    graph: Graph<P>,
    index: HashMap<P, NodeId>,
}

impl<P: Clone + Eq + Hash + Debug> Default for KeyedGraph<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone + Eq + Hash + Debug> KeyedGraph<P> {
    pub fn new() -> Self {
        KeyedGraph {
            graph: Graph::new(),
            index: HashMap::new(),
        }
    }

    /// Panics if `payload` already has a node.
    pub fn new_node(&mut self, payload: P) -> NodeId {
        assert!(
            !self.index.contains_key(&payload),
            "duplicate key {:?} in node index",
            payload
        );
        let id = self.graph.new_node(payload.clone());
        self.index.insert(payload, id);
        id
    }

    /// The node for `payload`, created on first request.
    pub fn node_for(&mut self, payload: &P) -> NodeId {
        match self.index.get(payload) {
            Some(&id) => id,
            None => self.new_node(payload.clone()),
        }
    }

    pub fn lookup(&self, payload: &P) -> Option<NodeId> {
        self.index.get(payload).copied()
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.graph.add_edge(from, to);
    }

    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) {
        self.graph.remove_edge(from, to);
    }

    pub fn remove_node(&mut self, id: NodeId) -> P {
        let payload = self.graph.remove_node(id);
        self.index.remove(&payload);
        payload
    }

    pub fn graph(&self) -> &Graph<P> {
        &self.graph
    }
}

impl<P> Deref for KeyedGraph<P> {
    type Target = Graph<P>;

    fn deref(&self) -> &Graph<P> {
        &self.graph
    }
}
