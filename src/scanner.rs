//! Fork-aware traversal engine over a recorded flow graph.
//!
//! [`ForkScanner`] resolves an append-only execution graph — nested
//! blocks plus parallel fork/join structure — into a single well-ordered
//! stream of [`ChunkVisitor`](crate::visitor::ChunkVisitor) callbacks.
//!
//! A scan runs in two phases:
//!
//! 1. **Ancestry discovery.** Starting from the supplied frontier
//!    (typically [`FlowGraph::heads`]), walk predecessor links backward,
//!    visiting each reachable node exactly once and recording successor
//!    links. The graph only stores predecessors; this phase inverts them.
//! 2. **Structured delivery.** From the run's root, deliver callbacks in
//!    forward linear order, recursing into parallel constructs so that a
//!    nested construct's callbacks are fully delivered before traversal
//!    moves past its boundary.
//!
//! Branches of a fork are visited in ascending branch-start id — append
//! order — which makes the callback sequence for an unmutated graph
//! fully deterministic. The recorded graph guarantees a consistent
//! per-branch order only; this tie-break is the scanner's own.
//!
//! Traversal tolerates runs still in progress: an open block or branch
//! simply never receives its end callback. Structurally malformed graphs
//! (unmatched boundaries, stray joins, a linear node with several
//! successors) abort the scan with a [`ScanError`] naming the offending
//! node, since continuing would report wrong chunk boundaries.
//!
//! # Examples
//!
//! ```rust
//! use flowscan::graph::FlowGraph;
//! use flowscan::scanner::ForkScanner;
//! use flowscan::types::NodeRole;
//! use flowscan::visitor::ChunkVisitor;
//!
//! struct CountingVisitor {
//!     atoms: usize,
//! }
//!
//! impl ChunkVisitor for CountingVisitor {
//!     fn atom_node(
//!         &mut self,
//!         _before: Option<&flowscan::graph::FlowNode>,
//!         _node: &flowscan::graph::FlowNode,
//!         _after: Option<&flowscan::graph::FlowNode>,
//!         _ctx: &flowscan::visitor::ScanContext,
//!     ) {
//!         self.atoms += 1;
//!     }
//! }
//!
//! let mut graph = FlowGraph::new();
//! let root = graph.append(NodeRole::Atom, "start", &[]).unwrap();
//! let step = graph.append(NodeRole::Atom, "build", &[root]).unwrap();
//! let _tip = graph.append(NodeRole::Atom, "done", &[step]).unwrap();
//!
//! let mut visitor = CountingVisitor { atoms: 0 };
//! ForkScanner::new(&graph)
//!     .scan(&graph.heads(), &mut visitor)
//!     .unwrap();
//! assert_eq!(visitor.atoms, 3);
//! ```

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::graph::{FlowGraph, FlowNode};
use crate::types::{FlowNodeId, NodeRole};
use crate::visitor::{ChunkVisitor, ScanContext};

/// Traversal errors: every variant is a contract violation of the
/// upstream graph recorder, never of the visitor.
#[derive(Debug, Error, Diagnostic)]
pub enum ScanError {
    /// `scan` was called with an empty frontier.
    #[error("cannot scan from an empty frontier")]
    #[diagnostic(
        code(flowscan::scanner::empty_frontier),
        help("Pass the run's current head nodes, e.g. FlowGraph::heads().")
    )]
    EmptyFrontier,

    /// A frontier or predecessor id does not resolve in the graph.
    #[error("node {node} is not present in the graph")]
    #[diagnostic(code(flowscan::scanner::unknown_node))]
    UnknownNode { node: FlowNodeId },

    /// The ancestry of the frontier resolves to more than one root.
    #[error("ancestry has multiple roots: {first} and {second}")]
    #[diagnostic(
        code(flowscan::scanner::multiple_roots),
        help("A well-formed run records exactly one start node.")
    )]
    MultipleRoots {
        first: FlowNodeId,
        second: FlowNodeId,
    },

    /// A closing boundary (block end, branch end, join) has no matching
    /// opener at its nesting position.
    #[error("unmatched {role} boundary at node {node}")]
    #[diagnostic(
        code(flowscan::scanner::unmatched_boundary),
        help("Block and branch boundaries must nest properly within their segment.")
    )]
    UnmatchedBoundary { node: FlowNodeId, role: NodeRole },

    /// A parallel-structure node was reached outside a parallel
    /// construct.
    #[error("stray {role} node {node} outside any parallel construct")]
    #[diagnostic(code(flowscan::scanner::stray_boundary))]
    StrayBoundary { node: FlowNodeId, role: NodeRole },

    /// A node that is not a fork has more than one successor.
    #[error("node {node} has multiple successors but is not a parallel fork")]
    #[diagnostic(
        code(flowscan::scanner::ambiguous_successor),
        help("Only parallel-fork nodes may branch; the recorder produced an inconsistent graph.")
    )]
    AmbiguousSuccessor { node: FlowNodeId },

    /// A fork's successor is not a branch start.
    #[error("fork {fork} is followed by {found} node {node}, expected a branch start")]
    #[diagnostic(code(flowscan::scanner::malformed_fork))]
    MalformedFork {
        fork: FlowNodeId,
        node: FlowNodeId,
        found: NodeRole,
    },
}

/// How a linear segment walk finished.
enum SegmentEnd {
    /// Ran out of successors: the run's tip, or an open branch head.
    Exhausted,
    /// Hit the branch-end boundary of the enclosing branch.
    BranchEnd(FlowNodeId),
}

/// Traversal engine binding a graph to one scan at a time.
///
/// The scanner is cheap to construct and holds no state between scans;
/// each call to [`scan`](Self::scan) rebuilds successor links for the
/// frontier it is given. Not intended for concurrent use — run one
/// scanner per traversal.
pub struct ForkScanner<'g> {
    graph: &'g FlowGraph,
    successors: FxHashMap<FlowNodeId, Vec<FlowNodeId>>,
    ctx: ScanContext,
}

impl<'g> ForkScanner<'g> {
    /// Creates a scanner over `graph`.
    #[must_use]
    pub fn new(graph: &'g FlowGraph) -> Self {
        Self {
            graph,
            successors: FxHashMap::default(),
            ctx: ScanContext::default(),
        }
    }

    /// Walks the ancestry of `heads` exactly once per node and delivers
    /// the full callback stream to `visitor`.
    ///
    /// Scanning the same unmutated graph twice produces identical
    /// callback sequences.
    #[instrument(skip_all, fields(heads = heads.len()))]
    pub fn scan(
        &mut self,
        heads: &[FlowNodeId],
        visitor: &mut dyn ChunkVisitor,
    ) -> Result<(), ScanError> {
        let root = self.discover(heads)?;
        debug!(%root, nodes = self.successors.len(), "ancestry discovered");
        self.ctx = ScanContext::default();
        match self.walk_segment(Some(root), None, visitor)? {
            SegmentEnd::Exhausted => Ok(()),
            // walk_segment rejects branch ends outside a branch before
            // ever returning them here.
            SegmentEnd::BranchEnd(node) => Err(ScanError::StrayBoundary {
                node,
                role: NodeRole::BranchEnd,
            }),
        }
    }

    /// Phase 1: backward walk from the frontier, inverting predecessor
    /// links into a successor map and locating the unique root.
    fn discover(&mut self, heads: &[FlowNodeId]) -> Result<FlowNodeId, ScanError> {
        if heads.is_empty() {
            return Err(ScanError::EmptyFrontier);
        }
        self.successors.clear();

        let mut pending: Vec<FlowNodeId> = Vec::new();
        for head in heads {
            self.node(*head)?;
            if !self.successors.contains_key(head) {
                self.successors.insert(*head, Vec::new());
                pending.push(*head);
            }
        }

        let mut root: Option<FlowNodeId> = None;
        while let Some(id) = pending.pop() {
            let node = self.node(id)?;
            if node.predecessors().is_empty() {
                match root {
                    None => root = Some(id),
                    Some(existing) if existing != id => {
                        let (first, second) = if existing < id {
                            (existing, id)
                        } else {
                            (id, existing)
                        };
                        return Err(ScanError::MultipleRoots { first, second });
                    }
                    Some(_) => {}
                }
            }
            for pred in node.predecessors() {
                self.node(*pred)?;
                if !self.successors.contains_key(pred) {
                    pending.push(*pred);
                }
                self.successors.entry(*pred).or_default().push(id);
            }
        }

        // Append-order tie-break: deterministic branch ordering and
        // callback sequences.
        for succ in self.successors.values_mut() {
            succ.sort_unstable();
            succ.dedup();
        }

        // Acyclic by construction (predecessors precede their node), so
        // a non-empty ancestry always bottoms out in a root.
        root.ok_or(ScanError::EmptyFrontier)
    }

    fn node(&self, id: FlowNodeId) -> Result<&'g FlowNode, ScanError> {
        self.graph.node(id).ok_or(ScanError::UnknownNode { node: id })
    }

    /// The single forward neighbor of a non-fork node, if any.
    fn linear_successor(&self, id: FlowNodeId) -> Result<Option<FlowNodeId>, ScanError> {
        match self.successors.get(&id).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([next]) => Ok(Some(*next)),
            Some(_) => Err(ScanError::AmbiguousSuccessor { node: id }),
        }
    }

    fn neighbor(&self, id: Option<FlowNodeId>) -> Result<Option<&'g FlowNode>, ScanError> {
        id.map(|id| self.node(id)).transpose()
    }

    /// Phase 2 workhorse: walks one linear segment, recursing into
    /// parallel constructs. `branch` carries the enclosing branch-start
    /// id when walking a branch interior, making branch-end nodes
    /// terminators rather than strays.
    fn walk_segment(
        &mut self,
        first: Option<FlowNodeId>,
        branch: Option<FlowNodeId>,
        visitor: &mut dyn ChunkVisitor,
    ) -> Result<SegmentEnd, ScanError> {
        let mut open_blocks: Vec<FlowNodeId> = Vec::new();
        let mut cursor = first;

        while let Some(id) = cursor {
            let node = self.node(id)?;
            trace!(node = %id, role = %node.role(), "visit");
            match node.role() {
                NodeRole::Atom => {
                    let before = self.neighbor(node.predecessors().first().copied())?;
                    let next = self.linear_successor(id)?;
                    visitor.atom_node(before, node, self.neighbor(next)?, &self.ctx);
                    cursor = next;
                }
                NodeRole::BlockStart => {
                    open_blocks.push(id);
                    let before = self.neighbor(node.predecessors().first().copied())?;
                    visitor.chunk_start(node, before, &self.ctx);
                    cursor = self.linear_successor(id)?;
                }
                NodeRole::BlockEnd => {
                    if open_blocks.pop().is_none() {
                        return Err(ScanError::UnmatchedBoundary {
                            node: id,
                            role: NodeRole::BlockEnd,
                        });
                    }
                    let next = self.linear_successor(id)?;
                    visitor.chunk_end(node, self.neighbor(next)?, &self.ctx);
                    cursor = next;
                }
                NodeRole::ParallelFork => {
                    cursor = self.walk_parallel(node, visitor)?;
                }
                NodeRole::BranchEnd => {
                    if branch.is_none() {
                        return Err(ScanError::StrayBoundary {
                            node: id,
                            role: NodeRole::BranchEnd,
                        });
                    }
                    if !open_blocks.is_empty() {
                        return Err(ScanError::UnmatchedBoundary {
                            node: id,
                            role: NodeRole::BranchEnd,
                        });
                    }
                    return Ok(SegmentEnd::BranchEnd(id));
                }
                role @ (NodeRole::BranchStart | NodeRole::ParallelJoin) => {
                    // Reachable only through walk_parallel; in a plain
                    // segment the recorder got the structure wrong.
                    return Err(ScanError::StrayBoundary { node: id, role });
                }
            }
        }
        Ok(SegmentEnd::Exhausted)
    }

    /// Delivers one whole parallel construct: `parallel_start`, each
    /// branch consecutively, then `parallel_end` at the join. Returns
    /// the node after the join, or `None` when the construct (or the
    /// run) is still open.
    fn walk_parallel(
        &mut self,
        fork: &FlowNode,
        visitor: &mut dyn ChunkVisitor,
    ) -> Result<Option<FlowNodeId>, ScanError> {
        visitor.parallel_start(fork, &self.ctx);

        let branch_starts = self
            .successors
            .get(&fork.id())
            .cloned()
            .unwrap_or_default();

        let outer_branch = self.ctx.current_branch;
        let mut join: Option<FlowNodeId> = None;
        let mut open_branches = 0usize;

        for branch_id in branch_starts {
            let branch_start = self.node(branch_id)?;
            if branch_start.role() != NodeRole::BranchStart {
                return Err(ScanError::MalformedFork {
                    fork: fork.id(),
                    node: branch_id,
                    found: branch_start.role(),
                });
            }

            self.ctx.parallel_depth += 1;
            self.ctx.current_branch = Some(branch_id);
            visitor.parallel_branch_start(fork, branch_start, &self.ctx);

            let interior = self.linear_successor(branch_id)?;
            let end = self.walk_segment(interior, Some(branch_id), visitor)?;
            match end {
                SegmentEnd::BranchEnd(end_id) => {
                    let branch_end = self.node(end_id)?;
                    visitor.parallel_branch_end(fork, branch_end, &self.ctx);
                    let after = self.linear_successor(end_id)?;
                    match (join, after) {
                        (_, None) => {
                            // Branch ended but the join is not recorded
                            // yet; construct still open.
                            open_branches += 1;
                        }
                        (None, Some(next)) => join = Some(next),
                        (Some(seen), Some(next)) if seen != next => {
                            return Err(ScanError::UnmatchedBoundary {
                                node: end_id,
                                role: NodeRole::BranchEnd,
                            });
                        }
                        (Some(_), Some(_)) => {}
                    }
                }
                SegmentEnd::Exhausted => open_branches += 1,
            }

            self.ctx.parallel_depth -= 1;
            self.ctx.current_branch = outer_branch;
        }

        let Some(join_id) = join else {
            // No branch reached a join: the whole construct is still in
            // progress and parallel_end never fires.
            return Ok(None);
        };

        let join_node = self.node(join_id)?;
        if join_node.role() != NodeRole::ParallelJoin {
            return Err(ScanError::StrayBoundary {
                node: join_id,
                role: join_node.role(),
            });
        }
        if open_branches > 0 {
            // A recorded join next to a still-open branch cannot happen
            // in a consistent log.
            return Err(ScanError::UnmatchedBoundary {
                node: join_id,
                role: NodeRole::ParallelJoin,
            });
        }

        visitor.parallel_end(fork, join_node, &self.ctx);
        self.linear_successor(join_id)
    }
}
