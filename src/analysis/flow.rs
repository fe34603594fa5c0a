use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::{InterferenceGraph, Liveness};
use crate::assem::Instr;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::graph::{Graph, NodeId};
use crate::temp::{Label, Temp};

/// Column at which dumps print the instruction text (or live-out set).
pub(crate) const TAB_STOP: usize = 50;

/// A control-flow graph with one node per instruction. An edge `a -> b` means `b`
/// may execute right after `a`.
///
/// The graph is fixed once built; liveness and interference only read it.
#[derive(Clone, Debug)]
pub struct FlowGraph {
    graph: Graph<Instr>,
}

impl FlowGraph {
    /// Links each instruction to the next one unless it is an unconditional jump, and
    /// to the label instruction of every jump target. Fails without producing a graph
    /// if a target is not defined in `body` or a label is defined twice.
    pub fn build(body: Vec<Instr>) -> Result<Self> {
        let mut graph = Graph::new();
        let mut labels: HashMap<Label, usize> = HashMap::new();
        let mut ids = Vec::with_capacity(body.len());

        for (i, instr) in body.into_iter().enumerate() {
            if let Some(label) = instr.defines() {
                if let Some(&first) = labels.get(label) {
                    return Err(AnalysisError::DuplicateLabel {
                        label: label.clone(),
                        first,
                        second: i,
                    });
                }
                labels.insert(label.clone(), i);
            }
            ids.push(graph.new_node(instr));
        }

        for (i, &id) in ids.iter().enumerate() {
            let instr: &Instr = graph.payload(id);
            let mut succs = Vec::new();
            if instr.falls_through() {
                if let Some(&next) = ids.get(i + 1) {
                    succs.push(next);
                }
            }
            for label in instr.targets() {
                match labels.get(label) {
                    Some(&at) => succs.push(ids[at]),
                    None => {
                        return Err(AnalysisError::UndefinedLabel {
                            label: label.clone(),
                            at: i,
                        })
                    }
                }
            }
            for succ in succs {
                graph.add_edge(id, succ);
            }
        }

        debug!(
            instructions = graph.len(),
            edges = graph.edge_count(),
            labels = labels.len(),
            "built flow graph"
        );
        Ok(FlowGraph { graph })
    }

    pub fn graph(&self) -> &Graph<Instr> {
        &self.graph
    }

    /// Nodes in instruction order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.nodes()
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.graph.contains(node)
    }

    pub fn instr(&self, node: NodeId) -> Result<&Instr> {
        self.graph.get(node).ok_or(AnalysisError::NodeNotFound(node))
    }

    pub fn def(&self, node: NodeId) -> Result<&[Temp]> {
        Ok(self.instr(node)?.def())
    }

    pub fn uses(&self, node: NodeId) -> Result<&[Temp]> {
        Ok(self.instr(node)?.uses())
    }

    pub fn is_move(&self, node: NodeId) -> Result<bool> {
        Ok(self.instr(node)?.is_move())
    }

    pub fn successors(&self, node: NodeId) -> Result<&[NodeId]> {
        self.instr(node)?;
        Ok(self.graph.successors(node))
    }

    pub fn predecessors(&self, node: NodeId) -> Result<&[NodeId]> {
        self.instr(node)?;
        Ok(self.graph.predecessors(node))
    }

    pub fn liveness(&self) -> Liveness {
        Liveness::compute(self)
    }

    /// Solves liveness and builds the interference graph, with `precolored` as the
    /// machine registers.
    pub fn interference_graph(&self, precolored: &[Temp]) -> Result<InterferenceGraph> {
        self.interference_graph_with(precolored, &AnalysisConfig::default())
    }

    pub fn interference_graph_with(
        &self,
        precolored: &[Temp],
        config: &AnalysisConfig,
    ) -> Result<InterferenceGraph> {
        let liveness = Liveness::compute_with(self, config.solver);
        InterferenceGraph::build(self, &liveness, precolored, config.spill_cost)
    }

    pub(crate) fn describe(&self, node: NodeId) -> String {
        let instr = self.graph.payload(node);
        let mut line = format!("{}: ", node);
        for t in instr.def() {
            line.push_str(&format!("{} ", t));
        }
        line.push_str(if instr.is_move() { "<= " } else { "<- " });
        for t in instr.uses() {
            line.push_str(&format!("{} ", t));
        }
        line.push_str("; goto ");
        for succ in self.graph.successors(node) {
            line.push_str(&format!("{} ", succ));
        }
        pad_to(&mut line, TAB_STOP);
        line
    }

    pub fn dump<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for node in self.nodes() {
            writeln!(out, "{}{}", self.describe(node), self.graph.payload(node))?;
        }
        Ok(())
    }
}

pub(crate) fn pad_to(line: &mut String, column: usize) {
    let width = line.chars().count();
    if width < column {
        line.push_str(&" ".repeat(column - width));
    } else {
        line.push(' ');
    }
}

impl fmt::Display for FlowGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump(f)
    }
}
