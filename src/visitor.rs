//! The chunk visitor contract driven by the fork scanner.
//!
//! A [`ChunkVisitor`] receives a well-ordered stream of callbacks as the
//! [`ForkScanner`](crate::scanner::ForkScanner) resolves a recorded flow
//! graph: chunk boundaries for logical blocks, parallel boundaries for
//! fork/join structure, and a per-node callback for everything else.
//! The scanner holds no knowledge of what a visitor does with the calls;
//! all eight callbacks default to no-ops so implementations override
//! only what they need.
//!
//! The reference implementation is
//! [`LinearChunkVisitor`](crate::chunks::LinearChunkVisitor); anything
//! needing nesting or parallel awareness builds its own state (a stack
//! of chunks keyed by depth, a map keyed by branch) on this same
//! contract — no scanner changes required.
//!
//! # Callback ordering
//!
//! - A nested construct's callbacks are fully delivered (start through
//!   end) before traversal continues past its boundary.
//! - For a parallel construct: `parallel_start`, then each branch's
//!   callbacks consecutively (`parallel_branch_start` → interior →
//!   `parallel_branch_end`), never interleaved across branches, then
//!   `parallel_end` at the join.
//! - An unterminated construct (run still in progress) simply never
//!   receives its end callback.

use serde::{Deserialize, Serialize};

use crate::graph::FlowNode;
use crate::types::FlowNodeId;

/// A contiguous logical grouping of nodes (one stage, one block).
///
/// `first_node`/`last_node` are the inclusive boundaries of the group;
/// `node_before`/`node_after` are its immediate linear neighbors, unset
/// at the run's edges. `pause_millis` accumulates non-executing time
/// attributed to the chunk.
///
/// A chunk with neither boundary set ([`is_empty`](Self::is_empty)) means
/// "nothing was recorded"; handlers receive one such chunk at the first
/// `chunk_start` of every traversal and must skip it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowChunk {
    /// Inclusive start of the group, unset before any chunk opened.
    pub first_node: Option<FlowNodeId>,
    /// Inclusive end of the group, unset while the block is still open.
    pub last_node: Option<FlowNodeId>,
    /// Node immediately preceding the chunk, unset at the run's start.
    pub node_before: Option<FlowNodeId>,
    /// Node immediately following the chunk, unset at the run's tip.
    pub node_after: Option<FlowNodeId>,
    /// Accumulated non-executing time attributed to this chunk.
    pub pause_millis: u64,
}

impl FlowChunk {
    /// Creates an empty chunk.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when neither boundary has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_node.is_none() && self.last_node.is_none()
    }

    /// Clears all fields back to the empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Read-only traversal position handed to every callback.
///
/// Replaces a back-reference to the scanner itself: visitors can query
/// where in the parallel structure the current callback sits without
/// borrowing the scanner.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScanContext {
    pub(crate) parallel_depth: usize,
    pub(crate) current_branch: Option<FlowNodeId>,
}

impl ScanContext {
    /// Nesting depth of parallel constructs at the current callback;
    /// 0 outside any parallel.
    #[must_use]
    pub fn parallel_depth(&self) -> usize {
        self.parallel_depth
    }

    /// The branch-start node id of the innermost branch being walked,
    /// if the callback sits inside a parallel branch.
    #[must_use]
    pub fn current_branch(&self) -> Option<FlowNodeId> {
        self.current_branch
    }
}

/// Callback interface driven by the fork scanner.
///
/// All methods default to no-ops. Implementations are purely reactive;
/// the scanner owns traversal order and delivers each node exactly once.
pub trait ChunkVisitor {
    /// A logical block opened at `start`. `before_block` is the node
    /// immediately preceding the block, or `None` when the block begins
    /// the run.
    fn chunk_start(&mut self, start: &FlowNode, before_block: Option<&FlowNode>, ctx: &ScanContext) {
        let _ = (start, before_block, ctx);
    }

    /// A logical block closed at `end`. `after_chunk` is the node
    /// immediately following it, or `None` when the block end is the
    /// run's current tip.
    fn chunk_end(&mut self, end: &FlowNode, after_chunk: Option<&FlowNode>, ctx: &ScanContext) {
        let _ = (end, after_chunk, ctx);
    }

    /// A parallel construct begins at the `fork` node. Fired before any
    /// branch callbacks of the construct.
    fn parallel_start(&mut self, fork: &FlowNode, ctx: &ScanContext) {
        let _ = (fork, ctx);
    }

    /// The parallel construct forked at `fork` closed at `join`. Fired
    /// after every branch's callbacks; never fired while the construct
    /// is still open.
    fn parallel_end(&mut self, fork: &FlowNode, join: &FlowNode, ctx: &ScanContext) {
        let _ = (fork, join, ctx);
    }

    /// One branch of the construct forked at `fork` begins.
    fn parallel_branch_start(
        &mut self,
        fork: &FlowNode,
        branch_start: &FlowNode,
        ctx: &ScanContext,
    ) {
        let _ = (fork, branch_start, ctx);
    }

    /// One branch of the construct forked at `fork` ended. Not fired for
    /// a branch still in progress.
    fn parallel_branch_end(&mut self, fork: &FlowNode, branch_end: &FlowNode, ctx: &ScanContext) {
        let _ = (fork, branch_end, ctx);
    }

    /// A node that is not itself a chunk or parallel boundary, with its
    /// immediate linear neighbors (`None` at the run's edges).
    fn atom_node(
        &mut self,
        before: Option<&FlowNode>,
        node: &FlowNode,
        after: Option<&FlowNode>,
        ctx: &ScanContext,
    ) {
        let _ = (before, node, after, ctx);
    }
}
