//! Canonical graphs shared across the integration tests.

use flowscan::actions::Action;
use flowscan::graph::FlowGraph;
use flowscan::types::{FlowNodeId, NodeRole};

/// root -> A(bs) -> A1 -> A2 -> A(be) -> B(bs) -> B1 -> B(be) -> tip
pub struct FlatRun {
    pub graph: FlowGraph,
    pub root: FlowNodeId,
    pub a_start: FlowNodeId,
    pub a1: FlowNodeId,
    pub a2: FlowNodeId,
    pub a_end: FlowNodeId,
    pub b_start: FlowNodeId,
    pub b1: FlowNodeId,
    pub b_end: FlowNodeId,
    pub tip: FlowNodeId,
}

pub fn flat_two_stage() -> FlatRun {
    let mut graph = FlowGraph::new();
    let root = graph.append(NodeRole::Atom, "root", &[]).unwrap();
    let a_start = graph.append(NodeRole::BlockStart, "A", &[root]).unwrap();
    let a1 = graph
        .append_with_actions(
            NodeRole::Atom,
            "A1",
            &[a_start],
            vec![Action::Pause { millis: 100 }],
        )
        .unwrap();
    let a2 = graph.append(NodeRole::Atom, "A2", &[a1]).unwrap();
    let a_end = graph.append(NodeRole::BlockEnd, "A end", &[a2]).unwrap();
    let b_start = graph.append(NodeRole::BlockStart, "B", &[a_end]).unwrap();
    let b1 = graph
        .append_with_actions(
            NodeRole::Atom,
            "B1",
            &[b_start],
            vec![Action::Pause { millis: 40 }],
        )
        .unwrap();
    let b_end = graph.append(NodeRole::BlockEnd, "B end", &[b1]).unwrap();
    let tip = graph.append(NodeRole::Atom, "tip", &[b_end]).unwrap();
    FlatRun {
        graph,
        root,
        a_start,
        a1,
        a2,
        a_end,
        b_start,
        b1,
        b_end,
        tip,
    }
}

/// Same as [`flat_two_stage`] but the run stops mid-B: no B(be), no tip.
pub fn flat_unterminated() -> FlatRun {
    let mut graph = FlowGraph::new();
    let root = graph.append(NodeRole::Atom, "root", &[]).unwrap();
    let a_start = graph.append(NodeRole::BlockStart, "A", &[root]).unwrap();
    let a1 = graph.append(NodeRole::Atom, "A1", &[a_start]).unwrap();
    let a2 = graph.append(NodeRole::Atom, "A2", &[a1]).unwrap();
    let a_end = graph.append(NodeRole::BlockEnd, "A end", &[a2]).unwrap();
    let b_start = graph.append(NodeRole::BlockStart, "B", &[a_end]).unwrap();
    let b1 = graph.append(NodeRole::Atom, "B1", &[b_start]).unwrap();
    FlatRun {
        graph,
        root,
        a_start,
        a1,
        a2,
        a_end,
        b_start,
        b1,
        // placeholders; the unterminated fixture has neither node
        b_end: b1,
        tip: b1,
    }
}

/// root -> fork -> { b1s -> x -> b1e, b2s -> y -> b2e } -> join -> tip
pub struct ParallelRun {
    pub graph: FlowGraph,
    pub root: FlowNodeId,
    pub fork: FlowNodeId,
    pub b1_start: FlowNodeId,
    pub x: FlowNodeId,
    pub b1_end: FlowNodeId,
    pub b2_start: FlowNodeId,
    pub y: FlowNodeId,
    pub b2_end: FlowNodeId,
    pub join: FlowNodeId,
    pub tip: FlowNodeId,
}

pub fn parallel_two_branch() -> ParallelRun {
    let mut graph = FlowGraph::new();
    let root = graph.append(NodeRole::Atom, "root", &[]).unwrap();
    let fork = graph.append(NodeRole::ParallelFork, "fork", &[root]).unwrap();
    let b1_start = graph.append(NodeRole::BranchStart, "b1", &[fork]).unwrap();
    let b2_start = graph.append(NodeRole::BranchStart, "b2", &[fork]).unwrap();
    let x = graph.append(NodeRole::Atom, "x", &[b1_start]).unwrap();
    let y = graph.append(NodeRole::Atom, "y", &[b2_start]).unwrap();
    let b1_end = graph.append(NodeRole::BranchEnd, "b1 end", &[x]).unwrap();
    let b2_end = graph.append(NodeRole::BranchEnd, "b2 end", &[y]).unwrap();
    let join = graph
        .append(NodeRole::ParallelJoin, "join", &[b1_end, b2_end])
        .unwrap();
    let tip = graph.append(NodeRole::Atom, "tip", &[join]).unwrap();
    ParallelRun {
        graph,
        root,
        fork,
        b1_start,
        x,
        b1_end,
        b2_start,
        y,
        b2_end,
        join,
        tip,
    }
}

/// Parallel construct with both branches still running: no branch ends,
/// no join. The frontier is the two branch interiors.
pub fn parallel_in_progress() -> ParallelRun {
    let mut graph = FlowGraph::new();
    let root = graph.append(NodeRole::Atom, "root", &[]).unwrap();
    let fork = graph.append(NodeRole::ParallelFork, "fork", &[root]).unwrap();
    let b1_start = graph.append(NodeRole::BranchStart, "b1", &[fork]).unwrap();
    let b2_start = graph.append(NodeRole::BranchStart, "b2", &[fork]).unwrap();
    let x = graph.append(NodeRole::Atom, "x", &[b1_start]).unwrap();
    let y = graph.append(NodeRole::Atom, "y", &[b2_start]).unwrap();
    ParallelRun {
        graph,
        root,
        fork,
        b1_start,
        x,
        b1_end: x,
        b2_start,
        y,
        b2_end: y,
        join: y,
        tip: y,
    }
}
