use std::collections::{BTreeSet, HashMap};
use std::fmt;

use bit_set::BitSet;
use tracing::debug;

use super::dataflow::{self, Solution};
use super::flow::FlowGraph;
use crate::config::LivenessSolver;
use crate::error::{AnalysisError, Result};
use crate::graph::NodeId;
use crate::temp::Temp;

/// Live-in and live-out sets for every node of one [`FlowGraph`].
///
/// The tables are the least solution of
///
/// ```text
/// out[n] = union of in[s] for s in succ(n)
/// in[n]  = use[n] | (out[n] - def[n])
/// ```
///
/// Sets are stored as bit sets over the temporaries the flow graph mentions and are
/// only handed out as copies. Rebuild after editing the flow graph.
#[derive(Clone, Debug)]
pub struct Liveness {
    slots: HashMap<NodeId, usize>,
    order: Vec<NodeId>,
    temps: Vec<Temp>,
    live_in: Vec<BitSet>,
    live_out: Vec<BitSet>,
    solver: LivenessSolver,
    steps: usize,
}

const NOT_ANALYSED: &str = "<not analysed>";

struct Problem {
    slots: HashMap<NodeId, usize>,
    order: Vec<NodeId>,
    temps: Vec<Temp>,
    temp_index: HashMap<Temp, usize>,
    succs: Vec<Vec<usize>>,
    uses: Vec<BitSet>,
    defs: Vec<BitSet>,
}

impl Problem {
    fn from(flow: &FlowGraph) -> Self {
        let order: Vec<NodeId> = flow.nodes().collect();
        let slots: HashMap<NodeId, usize> =
            order.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut temps = Vec::new();
        let mut temp_index = HashMap::new();
        let mut uses = Vec::with_capacity(order.len());
        let mut defs = Vec::with_capacity(order.len());
        let mut succs = Vec::with_capacity(order.len());

        for &id in &order {
            let instr = flow.graph().payload(id);
            let mut bits = |list: &[Temp]| {
                let mut set = BitSet::new();
                for t in list {
                    let i = *temp_index.entry(t.clone()).or_insert_with(|| {
                        temps.push(t.clone());
                        temps.len() - 1
                    });
                    set.insert(i);
                }
                set
            };
            defs.push(bits(instr.def()));
            uses.push(bits(instr.uses()));
            succs.push(
                flow.graph()
                    .successors(id)
                    .iter()
                    .map(|s| slots[s])
                    .collect(),
            );
        }

        Problem {
            slots,
            order,
            temps,
            temp_index,
            succs,
            uses,
            defs,
        }
    }

    fn solve(
        &self,
        solver: LivenessSolver,
        ins: Vec<BitSet>,
        outs: Vec<BitSet>,
    ) -> Solution<BitSet> {
        let meet = |acc: &mut BitSet, succ_in: &BitSet| acc.union_with(succ_in);
        let transfer = |i: usize, out: &BitSet| {
            // IN = USE | (OUT - DEF)
            let mut live = out.clone();
            live.difference_with(&self.defs[i]);
            live.union_with(&self.uses[i]);
            live
        };
        match solver {
            LivenessSolver::RoundRobin => dataflow::solve_backward_round_robin(
                &self.succs,
                ins,
                outs,
                BitSet::new(),
                meet,
                transfer,
            ),
            LivenessSolver::Worklist => dataflow::solve_backward_worklist(
                &self.succs,
                ins,
                outs,
                BitSet::new(),
                meet,
                transfer,
            ),
        }
    }

    fn finish(self, solver: LivenessSolver, solution: Solution<BitSet>) -> Liveness {
        debug!(
            ?solver,
            nodes = self.order.len(),
            temps = self.temps.len(),
            steps = solution.steps,
            "liveness solved"
        );
        Liveness {
            slots: self.slots,
            order: self.order,
            temps: self.temps,
            live_in: solution.ins,
            live_out: solution.outs,
            solver,
            steps: solution.steps,
        }
    }
}

impl Liveness {
    pub fn compute(flow: &FlowGraph) -> Self {
        Self::compute_with(flow, LivenessSolver::default())
    }

    pub fn compute_with(flow: &FlowGraph, solver: LivenessSolver) -> Self {
        let problem = Problem::from(flow);
        let n = problem.order.len();
        let solution = problem.solve(solver, vec![BitSet::new(); n], vec![BitSet::new(); n]);
        problem.finish(solver, solution)
    }

    /// Restarts the fixpoint from `seed` instead of from empty sets. Nodes or
    /// temporaries `seed` does not know start empty.
    ///
    /// Seeding with the solution for the same graph returns that solution unchanged.
    pub fn solve_from(flow: &FlowGraph, seed: &Liveness, solver: LivenessSolver) -> Self {
        let problem = Problem::from(flow);
        let translate = |set: Option<&BitSet>| {
            let mut bits = BitSet::new();
            for t in set.into_iter().flat_map(|s| s.iter()).map(|i| &seed.temps[i]) {
                if let Some(&i) = problem.temp_index.get(t) {
                    bits.insert(i);
                }
            }
            bits
        };
        let slot_of = |id: &NodeId| seed.slots.get(id).copied();
        let ins = problem
            .order
            .iter()
            .map(|id| translate(slot_of(id).map(|s| &seed.live_in[s])))
            .collect();
        let outs = problem
            .order
            .iter()
            .map(|id| translate(slot_of(id).map(|s| &seed.live_out[s])))
            .collect();
        let solution = problem.solve(solver, ins, outs);
        problem.finish(solver, solution)
    }

    fn slot(&self, node: NodeId) -> Result<usize> {
        self.slots
            .get(&node)
            .copied()
            .ok_or(AnalysisError::NodeNotFound(node))
    }

    fn to_temps(&self, set: &BitSet) -> BTreeSet<Temp> {
        set.iter().map(|i| self.temps[i].clone()).collect()
    }

    /// Temporaries live immediately after `node` executes.
    pub fn live_out(&self, node: NodeId) -> Result<BTreeSet<Temp>> {
        Ok(self.to_temps(&self.live_out[self.slot(node)?]))
    }

    /// Temporaries live immediately before `node` executes.
    pub fn live_in(&self, node: NodeId) -> Result<BTreeSet<Temp>> {
        Ok(self.to_temps(&self.live_in[self.slot(node)?]))
    }

    pub fn is_live_out(&self, node: NodeId, temp: &Temp) -> Result<bool> {
        let set = &self.live_out[self.slot(node)?];
        Ok(self
            .temps
            .iter()
            .position(|t| t == temp)
            .is_some_and(|i| set.contains(i)))
    }

    pub(crate) fn live_out_iter(&self, node: NodeId) -> Result<impl Iterator<Item = &Temp> + '_> {
        let slot = self.slot(node)?;
        Ok(self.live_out[slot].iter().map(move |i| &self.temps[i]))
    }

    pub fn solver(&self) -> LivenessSolver {
        self.solver
    }

    /// Passes (round-robin) or node visits (worklist) the fixpoint took.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Each node's flow-graph line followed by its live-out set.
    pub fn dump<W: fmt::Write>(&self, flow: &FlowGraph, out: &mut W) -> fmt::Result {
        for node in flow.nodes() {
            let mut line = flow.describe(node);
            match self.slot(node) {
                Ok(slot) => {
                    for t in self.to_temps(&self.live_out[slot]) {
                        line.push_str(&format!("{} ", t));
                    }
                }
                Err(_) => line.push_str(NOT_ANALYSED),
            }
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

impl PartialEq for Liveness {
    /// Same nodes with the same sets; how the fixpoint was reached is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
            && self.order.iter().all(|&id| {
                let (a, b) = (self.slots[&id], other.slots[&id]);
                self.to_temps(&self.live_in[a]) == other.to_temps(&other.live_in[b])
                    && self.to_temps(&self.live_out[a]) == other.to_temps(&other.live_out[b])
            })
    }
}
