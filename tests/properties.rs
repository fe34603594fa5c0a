use std::collections::BTreeSet;

use proptest::prelude::*;
use regflow::assem::Instr;
use regflow::temp::{Label, Temp};
use regflow::{FlowGraph, Liveness, LivenessSolver};

#[derive(Debug, Clone)]
enum Op {
    Oper(Vec<u8>, Vec<u8>),
    Move(u8, u8),
    Branch(u8, usize),
    Jump(usize),
}

fn op() -> impl Strategy<Value = Op> {
    let temp = 0u8..6;
    prop_oneof![
        4 => (
            prop::collection::vec(temp.clone(), 0..3),
            prop::collection::vec(temp.clone(), 0..3)
        )
            .prop_map(|(d, s)| Op::Oper(d, s)),
        2 => (temp.clone(), temp.clone()).prop_map(|(d, s)| Op::Move(d, s)),
        1 => (temp, any::<usize>()).prop_map(|(c, j)| Op::Branch(c, j)),
        1 => any::<usize>().prop_map(Op::Jump),
    ]
}

fn temp(i: u8) -> Temp {
    Temp::named(&format!("t{}", i))
}

fn temps(list: &[u8]) -> Vec<Temp> {
    list.iter().map(|&i| temp(i)).collect()
}

/// Every op gets its own label in front of it so jumps can land anywhere.
fn program(ops: &[Op]) -> Vec<Instr> {
    let label = |i: usize| Label::named(&format!("L{}", i % ops.len()));
    let mut body = Vec::new();
    for (i, op) in ops.iter().enumerate() {
        body.push(Instr::label(label(i)));
        body.push(match op {
            Op::Oper(d, s) => Instr::oper("op", temps(d), temps(s)),
            Op::Move(d, s) => Instr::mov("mov `s0, `d0", temp(*d), temp(*s)),
            Op::Branch(c, j) => Instr::branch("br `s0, `j0", vec![temp(*c)], vec![label(*j)]),
            Op::Jump(j) => Instr::jump("jmp `j0", vec![], vec![label(*j)]),
        });
    }
    body
}

fn flow_graph() -> impl Strategy<Value = FlowGraph> {
    prop::collection::vec(op(), 1..24).prop_map(|ops| FlowGraph::build(program(&ops)).unwrap())
}

proptest! {
    #[test]
    fn one_node_per_instruction(ops in prop::collection::vec(op(), 1..24)) {
        let flow = FlowGraph::build(program(&ops)).unwrap();
        prop_assert_eq!(flow.len(), ops.len() * 2);
        for n in flow.nodes() {
            prop_assert!(flow.successors(n).unwrap().len() <= 2);
        }
    }

    #[test]
    fn liveness_satisfies_equations(flow in flow_graph()) {
        let live = Liveness::compute(&flow);
        for n in flow.nodes() {
            let mut out = BTreeSet::new();
            for &s in flow.successors(n).unwrap() {
                out.extend(live.live_in(s).unwrap());
            }
            prop_assert_eq!(&live.live_out(n).unwrap(), &out);

            let defs: BTreeSet<Temp> = flow.def(n).unwrap().iter().cloned().collect();
            let mut expected: BTreeSet<Temp> = flow.uses(n).unwrap().iter().cloned().collect();
            expected.extend(out.difference(&defs).cloned());
            prop_assert_eq!(live.live_in(n).unwrap(), expected);
        }
    }

    #[test]
    fn liveness_is_a_fixpoint(flow in flow_graph()) {
        let live = Liveness::compute(&flow);
        for solver in [LivenessSolver::RoundRobin, LivenessSolver::Worklist] {
            prop_assert_eq!(&Liveness::solve_from(&flow, &live, solver), &live);
        }
    }

    #[test]
    fn solvers_agree(flow in flow_graph()) {
        let rr = Liveness::compute_with(&flow, LivenessSolver::RoundRobin);
        let wl = Liveness::compute_with(&flow, LivenessSolver::Worklist);
        prop_assert_eq!(rr, wl);
    }

    #[test]
    fn interference_is_symmetric_and_irreflexive(flow in flow_graph()) {
        let ig = flow.interference_graph(&[temp(0)]).unwrap();
        for a in ig.nodes() {
            prop_assert!(!ig.goes_to(a, a));
            for &b in ig.successors(a) {
                prop_assert!(ig.goes_to(b, a));
                prop_assert!(ig.comes_from(a, b));
            }
            prop_assert_eq!(ig.in_degree(a), ig.out_degree(a));
        }
    }

    #[test]
    fn moves_match_move_instructions(flow in flow_graph()) {
        let ig = flow.interference_graph(&[]).unwrap();
        let expected = flow.nodes().filter(|&n| flow.is_move(n).unwrap()).count();
        prop_assert_eq!(ig.moves().len(), expected);
    }
}
