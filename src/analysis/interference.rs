use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Deref;

use tracing::{debug, trace};

use super::{FlowGraph, Liveness, SpillCostModel};
use crate::assem::Instr;
use crate::error::{AnalysisError, Result};
use crate::graph::{KeyedGraph, NodeId};
use crate::temp::Temp;

/// A coalescing candidate: the two ends of a move instruction. Not an edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub dst: NodeId,
    pub src: NodeId,
}

/// Undirected graph over temporaries: an edge means the two must not share a
/// register. Each edge is stored in both directions and no temporary is adjacent to
/// itself.
///
/// Every temporary the flow graph mentions has a node, as does every pre-colored
/// register, even when it interferes with nothing.
#[derive(Clone, Debug)]
pub struct InterferenceGraph {
    graph: KeyedGraph<Temp>,
    moves: Vec<Move>,
    precolored: HashSet<NodeId>,
    occurrences: HashMap<NodeId, usize>,
    spill_cost: SpillCostModel,
}

impl InterferenceGraph {
    /// At each instruction, every temporary it defines interferes with every other
    /// temporary live out of it. A move `t <- s` is exempt from the `(t, s)` edge and
    /// is recorded instead; if `t` is later redefined by a non-move while `s` is still
    /// live, the pair is forced apart after all.
    pub fn build(
        flow: &FlowGraph,
        liveness: &Liveness,
        precolored: &[Temp],
        spill_cost: SpillCostModel,
    ) -> Result<Self> {
        let mut ig = InterferenceGraph {
            graph: KeyedGraph::new(),
            moves: Vec::new(),
            precolored: HashSet::new(),
            occurrences: HashMap::new(),
            spill_cost,
        };

        for t in precolored {
            let node = ig.graph.node_for(t);
            ig.precolored.insert(node);
        }
        for node in flow.nodes() {
            let instr = flow.instr(node)?;
            for t in instr.def().iter().chain(instr.uses()) {
                let n = ig.graph.node_for(t);
                *ig.occurrences.entry(n).or_insert(0) += 1;
            }
        }

        for node in flow.nodes() {
            let live_out: Vec<&Temp> = liveness.live_out_iter(node)?.collect();
            match flow.instr(node)? {
                Instr::Move { dst, src, .. } => {
                    let d = ig.graph.node_for(dst);
                    let s = ig.graph.node_for(src);
                    for &o in &live_out {
                        if o == dst {
                            continue;
                        }
                        if o == src {
                            trace!(%dst, %src, "move source exempt from interference");
                            continue;
                        }
                        let o = ig.graph.node_for(o);
                        ig.interfere(d, o);
                    }
                    ig.moves.push(Move { dst: d, src: s });
                }
                instr => {
                    for def in instr.def() {
                        let d = ig.graph.node_for(def);
                        for &o in &live_out {
                            if o == def {
                                continue;
                            }
                            let o = ig.graph.node_for(o);
                            ig.constrain_clobbered_moves(d, o);
                            ig.interfere(d, o);
                        }
                    }
                }
            }
        }

        debug!(
            temps = ig.graph.len(),
            edges = ig.graph.edge_count() / 2,
            moves = ig.moves.len(),
            precolored = ig.precolored.len(),
            "built interference graph"
        );
        Ok(ig)
    }

    fn constrain_clobbered_moves(&mut self, def: NodeId, live: NodeId) {
        let clobbered: Vec<Move> = self
            .moves
            .iter()
            .filter(|m| m.dst == def && m.src == live)
            .copied()
            .collect();
        for m in clobbered {
            trace!(
                dst = %self.graph.payload(m.dst),
                src = %self.graph.payload(m.src),
                "move destination redefined while source is live"
            );
            // Duplicates the regular (def, live) edge the caller adds next.
            self.interfere(m.dst, m.src);
        }
    }

    fn interfere(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        self.graph.add_edge(a, b);
        self.graph.add_edge(b, a);
    }

    pub fn graph(&self) -> &KeyedGraph<Temp> {
        &self.graph
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn node(&self, temp: &Temp) -> Result<NodeId> {
        self.graph
            .lookup(temp)
            .ok_or_else(|| AnalysisError::TempNotFound(temp.clone()))
    }

    pub fn temp(&self, node: NodeId) -> Result<&Temp> {
        self.graph.get(node).ok_or(AnalysisError::NodeNotFound(node))
    }

    pub fn interferes(&self, a: &Temp, b: &Temp) -> Result<bool> {
        Ok(self.graph.goes_to(self.node(a)?, self.node(b)?))
    }

    /// Temporaries that may not share a register with `node`.
    pub fn neighbors(&self, node: NodeId) -> Result<&[NodeId]> {
        self.temp(node)?;
        Ok(self.graph.successors(node))
    }

    pub fn is_precolored(&self, node: NodeId) -> bool {
        self.precolored.contains(&node)
    }

    /// Number of instructions that define or use `node`'s temporary.
    pub fn occurrences(&self, node: NodeId) -> usize {
        self.occurrences.get(&node).copied().unwrap_or(0)
    }

    pub fn spill_cost(&self, node: NodeId) -> Result<f64> {
        let degree = self.neighbors(node)?.len();
        Ok(self
            .spill_cost
            .cost(self.occurrences(node), degree, self.is_precolored(node)))
    }

    /// Hands the graph and move list over, e.g. to an allocator that coalesces and
    /// simplifies its own copy.
    pub fn into_parts(self) -> (KeyedGraph<Temp>, Vec<Move>) {
        (self.graph, self.moves)
    }

    pub fn dump<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        self.graph.dump_with(out, |_, t| t.to_string())?;
        for m in &self.moves {
            writeln!(
                out,
                "{} <= {}",
                self.graph.payload(m.dst),
                self.graph.payload(m.src)
            )?;
        }
        Ok(())
    }
}

impl Deref for InterferenceGraph {
    type Target = KeyedGraph<Temp>;

    fn deref(&self) -> &KeyedGraph<Temp> {
        &self.graph
    }
}

impl fmt::Display for InterferenceGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump(f)
    }
}
