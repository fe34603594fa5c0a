use std::fmt;
use std::ops::Range;

use super::node::{GraphId, Node, NodeId};

/// A directed graph whose nodes carry a payload `P`.
///
/// Nodes live in an arena indexed by [`NodeId`]; removal leaves a hole so the
/// remaining handles stay valid. Adjacency is kept symmetric: `a` lists `b` as a
/// successor iff `b` lists `a` as a predecessor, and an edge is never stored twice.
///
/// Handing a graph a `NodeId` it did not create is a bug in the caller and panics.
/// A clone accepts the handles that existed when it was taken; nodes added to either
/// side afterwards are foreign to the other.
#[derive(Debug)]
pub struct Graph<P> {
    id: GraphId,
    // Index of the first node handed out under `id`.
    first: u32,
    inherited: Vec<(GraphId, Range<u32>)>,
    nodes: Vec<Option<Node<P>>>,
    live: usize,
}

impl<P: Clone> Clone for Graph<P> {
    fn clone(&self) -> Self {
        let len = self.nodes.len() as u32;
        let mut inherited = self.inherited.clone();
        inherited.push((self.id, self.first..len));
        Graph {
            id: GraphId::fresh(),
            first: len,
            inherited,
            nodes: self.nodes.clone(),
            live: self.live,
        }
    }
}

impl<P> Default for Graph<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Graph<P> {
    pub fn new() -> Self {
        Graph {
            id: GraphId::fresh(),
            first: 0,
            inherited: Vec::new(),
            nodes: Vec::new(),
            live: 0,
        }
    }

    fn owns(&self, id: NodeId) -> bool {
        if id.graph == self.id {
            return id.index >= self.first;
        }
        self.inherited
            .iter()
            .any(|(graph, range)| *graph == id.graph && range.contains(&id.index))
    }

    fn handle(&self, index: u32) -> NodeId {
        let graph = if index >= self.first {
            self.id
        } else {
            self.inherited
                .iter()
                .find(|(_, range)| range.contains(&index))
                .map_or(self.id, |(graph, _)| *graph)
        };
        NodeId { graph, index }
    }

    pub fn new_node(&mut self, payload: P) -> NodeId {
        let index = u32::try_from(self.nodes.len()).expect("graph node count overflows u32");
        self.nodes.push(Some(Node::new(payload)));
        self.live += 1;
        NodeId {
            graph: self.id,
            index,
        }
    }

    fn slot(&self, id: NodeId) -> usize {
        assert!(self.owns(id), "node {} belongs to a different graph", id);
        id.index as usize
    }

    fn node(&self, id: NodeId) -> &Node<P> {
        let slot = self.slot(id);
        match self.nodes.get(slot).and_then(|n| n.as_ref()) {
            Some(node) => node,
            None => panic!("node {} has been removed from this graph", id),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<P> {
        let slot = self.slot(id);
        match self.nodes.get_mut(slot).and_then(|n| n.as_mut()) {
            Some(node) => node,
            None => panic!("node {} has been removed from this graph", id),
        }
    }

    /// Whether `id` names a live node of this graph. Never panics.
    pub fn contains(&self, id: NodeId) -> bool {
        self.owns(id)
            && self
                .nodes
                .get(id.index as usize)
                .is_some_and(|n| n.is_some())
    }

    pub fn get(&self, id: NodeId) -> Option<&P> {
        if !self.contains(id) {
            return None;
        }
        self.nodes[id.index as usize].as_ref().map(|n| &n.payload)
    }

    pub fn payload(&self, id: NodeId) -> &P {
        &self.node(id).payload
    }

    /// Live nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(move |(i, n)| n.as_ref().map(|_| self.handle(i as u32)))
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().flatten().map(|n| n.succs.len()).sum()
    }

    /// Adds `from -> to`. Adding an edge that already exists does nothing.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        let _ = self.node(to);
        if self.goes_to(from, to) {
            return;
        }
        self.node_mut(from).succs.push(to);
        self.node_mut(to).preds.push(from);
    }

    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) {
        self.node_mut(from).succs.retain(|&n| n != to);
        self.node_mut(to).preds.retain(|&n| n != from);
    }

    /// Removes `id` and every edge touching it, returning its payload.
    pub fn remove_node(&mut self, id: NodeId) -> P {
        for pred in self.node(id).preds.clone() {
            self.remove_edge(pred, id);
        }
        for succ in self.node(id).succs.clone() {
            self.remove_edge(id, succ);
        }
        let slot = self.slot(id);
        self.live -= 1;
        match self.nodes[slot].take() {
            Some(node) => node.payload,
            None => unreachable!(),
        }
    }

    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).succs
    }

    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).preds
    }

    /// Successors followed by predecessors.
    pub fn adj(&self, id: NodeId) -> Vec<NodeId> {
        let node = self.node(id);
        node.succs.iter().chain(node.preds.iter()).copied().collect()
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.node(id).preds.len()
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.node(id).succs.len()
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.in_degree(id) + self.out_degree(id)
    }

    pub fn goes_to(&self, from: NodeId, to: NodeId) -> bool {
        self.node(from).succs.contains(&to)
    }

    pub fn comes_from(&self, to: NodeId, from: NodeId) -> bool {
        self.node(to).preds.contains(&from)
    }

    pub fn is_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.goes_to(a, b) || self.comes_from(a, b)
    }

    /// Writes one line per node: `name: succ succ ...`.
    pub fn dump_with<W, F>(&self, out: &mut W, name: F) -> fmt::Result
    where
        W: fmt::Write,
        F: Fn(NodeId, &P) -> String,
    {
        for id in self.nodes() {
            write!(out, "{}: ", name(id, self.payload(id)))?;
            for &succ in self.successors(id) {
                write!(out, "{} ", name(succ, self.payload(succ)))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn dump<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        self.dump_with(out, |id, _| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> (Graph<&'static str>, [NodeId; 4]) {
        let mut g = Graph::new();
        let a = g.new_node("a");
        let b = g.new_node("b");
        let c = g.new_node("c");
        let d = g.new_node("d");
        g.add_edge(a, b);
        g.add_edge(a, c);
        g.add_edge(b, d);
        g.add_edge(c, d);
        (g, [a, b, c, d])
    }

    #[test]
    fn edges_are_mirrored() {
        let (g, [a, b, c, d]) = diamond();
        assert_eq!(g.successors(a), &[b, c]);
        assert_eq!(g.predecessors(d), &[b, c]);
        assert!(g.goes_to(a, b));
        assert!(g.comes_from(b, a));
        assert!(!g.goes_to(b, a));
        assert!(g.is_adjacent(b, a));
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn add_edge_is_idempotent() {
        let (mut g, [a, b, _, _]) = diamond();
        g.add_edge(a, b);
        g.add_edge(a, b);
        assert_eq!(g.out_degree(a), 2);
        assert_eq!(g.in_degree(b), 1);
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn degree_counts_both_directions() {
        let (g, [a, b, _, d]) = diamond();
        assert_eq!(g.degree(a), 2);
        assert_eq!(g.degree(b), 2);
        assert_eq!(g.degree(d), 2);
        assert_eq!(g.adj(b), vec![d, a]);
    }

    #[test]
    fn remove_edge_clears_both_sides() {
        let (mut g, [a, b, _, _]) = diamond();
        g.remove_edge(a, b);
        assert!(!g.goes_to(a, b));
        assert!(!g.comes_from(b, a));
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let (mut g, [a, b, c, d]) = diamond();
        assert_eq!(g.remove_node(b), "b");
        assert!(!g.contains(b));
        assert_eq!(g.len(), 3);
        for n in g.nodes() {
            assert!(!g.successors(n).contains(&b));
            assert!(!g.predecessors(n).contains(&b));
        }
        assert_eq!(g.successors(a), &[c]);
        assert_eq!(g.predecessors(d), &[c]);
        assert_eq!(g.nodes().collect::<Vec<_>>(), vec![a, c, d]);
    }

    #[test]
    fn self_loop_removal() {
        let mut g = Graph::new();
        let a = g.new_node(1);
        g.add_edge(a, a);
        assert_eq!(g.degree(a), 2);
        g.remove_node(a);
        assert!(g.is_empty());
    }

    #[test]
    fn get_on_foreign_node_is_none() {
        let (g, _) = diamond();
        let mut other = Graph::new();
        let x = other.new_node("x");
        assert!(!g.contains(x));
        assert_eq!(g.get(x), None);
    }

    #[test]
    #[should_panic(expected = "different graph")]
    fn foreign_edge_panics() {
        let (mut g, [a, _, _, _]) = diamond();
        let mut other = Graph::new();
        let x = other.new_node("x");
        g.add_edge(a, x);
    }

    #[test]
    #[should_panic(expected = "removed")]
    fn removed_node_panics() {
        let (mut g, [a, b, _, _]) = diamond();
        g.remove_node(b);
        g.add_edge(a, b);
    }

    #[test]
    fn clone_shares_handles() {
        let (g, [a, b, _, _]) = diamond();
        let mut copy = g.clone();
        copy.remove_edge(a, b);
        assert!(g.goes_to(a, b));
        assert!(!copy.goes_to(a, b));
        assert_eq!(copy.nodes().collect::<Vec<_>>(), g.nodes().collect::<Vec<_>>());
    }

    #[test]
    fn clone_of_clone_keeps_original_handles() {
        let (g, [a, _, _, d]) = diamond();
        let mut copy = g.clone();
        let e = copy.new_node("e");
        let mut second = copy.clone();
        second.add_edge(d, e);
        second.remove_node(a);
        assert!(second.goes_to(d, e));
        assert!(g.contains(a));
        assert!(!g.contains(e));
    }

    #[test]
    #[should_panic(expected = "different graph")]
    fn node_added_to_clone_is_foreign_to_original() {
        let (mut g, [a, _, _, _]) = diamond();
        let copy_only = g.clone().new_node("copy only");
        let own = g.new_node("own");
        assert!(!g.contains(copy_only));
        assert_ne!(copy_only, own);
        g.add_edge(a, copy_only);
    }

    #[test]
    #[should_panic(expected = "different graph")]
    fn node_added_to_original_is_foreign_to_clone() {
        let (mut g, [a, _, _, _]) = diamond();
        let mut copy = g.clone();
        let late = g.new_node("late");
        copy.new_node("copy only");
        copy.add_edge(a, late);
    }

    #[test]
    fn dump_lists_successors() {
        let (g, _) = diamond();
        let mut out = String::new();
        g.dump(&mut out).unwrap();
        assert_eq!(out, "0: 1 2 \n1: 3 \n2: 3 \n3: \n");

        let mut named = String::new();
        g.dump_with(&mut named, |_, p| p.to_string()).unwrap();
        assert!(named.starts_with("a: b c \n"));
    }
}
