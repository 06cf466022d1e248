//! A visitor that records the full callback stream for ordering
//! assertions.

use flowscan::graph::FlowNode;
use flowscan::types::FlowNodeId;
use flowscan::visitor::{ChunkVisitor, ScanContext};

/// One observed callback, by node id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Callback {
    ChunkStart {
        start: FlowNodeId,
        before: Option<FlowNodeId>,
    },
    ChunkEnd {
        end: FlowNodeId,
        after: Option<FlowNodeId>,
    },
    ParallelStart {
        fork: FlowNodeId,
    },
    ParallelEnd {
        fork: FlowNodeId,
        join: FlowNodeId,
    },
    BranchStart {
        fork: FlowNodeId,
        branch: FlowNodeId,
    },
    BranchEnd {
        fork: FlowNodeId,
        branch_end: FlowNodeId,
    },
    Atom {
        before: Option<FlowNodeId>,
        node: FlowNodeId,
        after: Option<FlowNodeId>,
        depth: usize,
        branch: Option<FlowNodeId>,
    },
}

#[derive(Debug, Default)]
pub struct RecordingVisitor {
    pub events: Vec<Callback>,
}

impl RecordingVisitor {
    pub fn new() -> Self {
        Self::default()
    }
}

fn id(node: Option<&FlowNode>) -> Option<FlowNodeId> {
    node.map(FlowNode::id)
}

impl ChunkVisitor for RecordingVisitor {
    fn chunk_start(&mut self, start: &FlowNode, before: Option<&FlowNode>, _ctx: &ScanContext) {
        self.events.push(Callback::ChunkStart {
            start: start.id(),
            before: id(before),
        });
    }

    fn chunk_end(&mut self, end: &FlowNode, after: Option<&FlowNode>, _ctx: &ScanContext) {
        self.events.push(Callback::ChunkEnd {
            end: end.id(),
            after: id(after),
        });
    }

    fn parallel_start(&mut self, fork: &FlowNode, _ctx: &ScanContext) {
        self.events.push(Callback::ParallelStart { fork: fork.id() });
    }

    fn parallel_end(&mut self, fork: &FlowNode, join: &FlowNode, _ctx: &ScanContext) {
        self.events.push(Callback::ParallelEnd {
            fork: fork.id(),
            join: join.id(),
        });
    }

    fn parallel_branch_start(&mut self, fork: &FlowNode, branch_start: &FlowNode, _ctx: &ScanContext) {
        self.events.push(Callback::BranchStart {
            fork: fork.id(),
            branch: branch_start.id(),
        });
    }

    fn parallel_branch_end(&mut self, fork: &FlowNode, branch_end: &FlowNode, _ctx: &ScanContext) {
        self.events.push(Callback::BranchEnd {
            fork: fork.id(),
            branch_end: branch_end.id(),
        });
    }

    fn atom_node(
        &mut self,
        before: Option<&FlowNode>,
        node: &FlowNode,
        after: Option<&FlowNode>,
        ctx: &ScanContext,
    ) {
        self.events.push(Callback::Atom {
            before: id(before),
            node: node.id(),
            after: id(after),
            depth: ctx.parallel_depth(),
            branch: ctx.current_branch(),
        });
    }
}
