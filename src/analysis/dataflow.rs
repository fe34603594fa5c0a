//! Backward dataflow solvers over a successor table.
//!
//! Node `i`'s successors are `succs[i]`. Each solver starts from the given `ins`/`outs`
//! (all `bottom` for a fresh analysis) and iterates
//!
//! - `OUT[i] = meet over IN[s] for s in succs[i]` (starting from `bottom`)
//! - `IN[i]  = transfer(i, OUT[i])`
//!
//! until nothing changes. Termination needs `meet_into` and `transfer` to be monotone
//! over a lattice of finite height.

use std::collections::VecDeque;

use tracing::trace;

pub(crate) struct Solution<S> {
    pub(crate) ins: Vec<S>,
    pub(crate) outs: Vec<S>,
    /// Passes for round-robin, node visits for the worklist.
    pub(crate) steps: usize,
}

fn preds_of(succs: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut preds = vec![Vec::new(); succs.len()];
    for (i, ss) in succs.iter().enumerate() {
        for &s in ss {
            preds[s].push(i);
        }
    }
    preds
}

fn visit<S, MeetInto, Transfer>(
    i: usize,
    succs: &[Vec<usize>],
    ins: &mut [S],
    outs: &mut [S],
    bottom: &S,
    meet_into: &mut MeetInto,
    transfer: &mut Transfer,
) -> bool
where
    S: Clone + PartialEq,
    MeetInto: FnMut(&mut S, &S),
    Transfer: FnMut(usize, &S) -> S,
{
    let mut new_out = bottom.clone();
    for &s in &succs[i] {
        meet_into(&mut new_out, &ins[s]);
    }
    let mut changed = false;
    if new_out != outs[i] {
        outs[i] = new_out;
        changed = true;
    }
    let new_in = transfer(i, &outs[i]);
    if new_in != ins[i] {
        ins[i] = new_in;
        changed = true;
    }
    changed
}

/// Full passes in reverse node order until one pass changes nothing.
pub(crate) fn solve_backward_round_robin<S, MeetInto, Transfer>(
    succs: &[Vec<usize>],
    mut ins: Vec<S>,
    mut outs: Vec<S>,
    bottom: S,
    mut meet_into: MeetInto,
    mut transfer: Transfer,
) -> Solution<S>
where
    S: Clone + PartialEq,
    MeetInto: FnMut(&mut S, &S),
    Transfer: FnMut(usize, &S) -> S,
{
    let mut passes = 0;
    loop {
        passes += 1;
        let mut changed = false;
        for i in (0..succs.len()).rev() {
            changed |= visit(
                i,
                succs,
                &mut ins,
                &mut outs,
                &bottom,
                &mut meet_into,
                &mut transfer,
            );
        }
        trace!(pass = passes, changed, "liveness pass");
        if !changed {
            break;
        }
    }
    Solution {
        ins,
        outs,
        steps: passes,
    }
}

/// Worklist of dirty nodes. A node whose IN or OUT changes re-queues its
/// predecessors; each node sits in the queue at most once.
pub(crate) fn solve_backward_worklist<S, MeetInto, Transfer>(
    succs: &[Vec<usize>],
    mut ins: Vec<S>,
    mut outs: Vec<S>,
    bottom: S,
    mut meet_into: MeetInto,
    mut transfer: Transfer,
) -> Solution<S>
where
    S: Clone + PartialEq,
    MeetInto: FnMut(&mut S, &S),
    Transfer: FnMut(usize, &S) -> S,
{
    let n = succs.len();
    let preds = preds_of(succs);

    let mut work: VecDeque<usize> = (0..n).rev().collect();
    let mut queued = vec![true; n];
    let mut visits = 0;

    while let Some(i) = work.pop_front() {
        queued[i] = false;
        visits += 1;
        let changed = visit(
            i,
            succs,
            &mut ins,
            &mut outs,
            &bottom,
            &mut meet_into,
            &mut transfer,
        );
        if changed {
            trace!(node = i, "liveness changed, requeueing predecessors");
            for &p in &preds[i] {
                if !queued[p] {
                    queued[p] = true;
                    work.push_back(p);
                }
            }
        }
    }

    Solution {
        ins,
        outs,
        steps: visits,
    }
}
