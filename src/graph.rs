//! Append-only flow graph: the recorded execution history this crate
//! analyzes.
//!
//! A [`FlowGraph`] is an arena of immutable [`FlowNode`]s. Nodes are
//! appended with their predecessors already present, never mutated, and
//! never removed — the graph is a faithful log of what the pipeline did.
//! Construction of the graph belongs to the upstream recorder; this
//! module provides the minimal in-memory implementation that the
//! [`ForkScanner`](crate::scanner::ForkScanner) and the test suite
//! consume.
//!
//! # Examples
//!
//! ```rust
//! use flowscan::graph::FlowGraph;
//! use flowscan::types::NodeRole;
//!
//! let mut graph = FlowGraph::new();
//! let root = graph.append(NodeRole::Atom, "start", &[]).unwrap();
//! let step = graph.append(NodeRole::Atom, "build", &[root]).unwrap();
//!
//! assert_eq!(graph.len(), 2);
//! assert_eq!(graph.heads(), vec![step]);
//! assert_eq!(graph.node(step).unwrap().predecessors(), &[root]);
//! ```

use miette::Diagnostic;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::{Action, ActionKind};
use crate::types::{FlowNodeId, NodeRole};

/// One immutable record of a pipeline execution step.
///
/// A node's identity, role, predecessors, and attached actions are fixed
/// at append time. The analysis side of this crate only ever reads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    id: FlowNodeId,
    display_name: String,
    role: NodeRole,
    predecessors: Vec<FlowNodeId>,
    actions: Vec<Action>,
}

impl FlowNode {
    /// This node's stable identifier.
    #[must_use]
    pub fn id(&self) -> FlowNodeId {
        self.id
    }

    /// Human-readable name for diagnostics and display.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Structural role of this node.
    #[must_use]
    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// Ordered predecessor ids: empty for the run's root, one for a
    /// linear step, several at a join point.
    #[must_use]
    pub fn predecessors(&self) -> &[FlowNodeId] {
        &self.predecessors
    }

    /// Returns `true` if an action of the given kind is attached.
    #[must_use]
    pub fn has_action(&self, kind: ActionKind) -> bool {
        self.action(kind).is_some()
    }

    /// Looks up the attached action of the given kind, if any.
    /// At most one action of each kind exists per node.
    #[must_use]
    pub fn action(&self, kind: ActionKind) -> Option<&Action> {
        self.actions.iter().find(|a| a.kind() == kind)
    }

    /// The workspace label, if this node's work was dispatched to an
    /// execution agent.
    #[must_use]
    pub fn workspace_assignment(&self) -> Option<&str> {
        match self.action(ActionKind::WorkspaceAssignment) {
            Some(Action::WorkspaceAssignment { node_label }) => Some(node_label),
            _ => None,
        }
    }

    /// The recorded queue-item reference, if scheduling evidence exists.
    #[must_use]
    pub fn queue_correlation(&self) -> Option<crate::queue::QueueItemRef> {
        match self.action(ActionKind::QueueCorrelation) {
            Some(Action::QueueCorrelation(item_ref)) => Some(*item_ref),
            _ => None,
        }
    }

    /// Recorded pause time for this node, or 0 if none was recorded.
    #[must_use]
    pub fn pause_millis(&self) -> u64 {
        match self.action(ActionKind::Pause) {
            Some(Action::Pause { millis }) => *millis,
            _ => 0,
        }
    }
}

/// Append-only arena of [`FlowNode`]s for one pipeline run.
///
/// Ids are assigned densely in append order, which doubles as the
/// deterministic tie-break used by the scanner when ordering parallel
/// branches.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    nodes: Vec<FlowNode>,
}

impl FlowGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node with no attached actions.
    ///
    /// All predecessors must already exist in the graph.
    pub fn append(
        &mut self,
        role: NodeRole,
        display_name: impl Into<String>,
        predecessors: &[FlowNodeId],
    ) -> Result<FlowNodeId, GraphError> {
        self.append_with_actions(role, display_name, predecessors, Vec::new())
    }

    /// Appends a node carrying persistent actions.
    ///
    /// All predecessors must already exist, and at most one action of
    /// each kind may be supplied.
    pub fn append_with_actions(
        &mut self,
        role: NodeRole,
        display_name: impl Into<String>,
        predecessors: &[FlowNodeId],
        actions: Vec<Action>,
    ) -> Result<FlowNodeId, GraphError> {
        let id = FlowNodeId(self.nodes.len() as u64);
        for pred in predecessors {
            if self.node(*pred).is_none() {
                return Err(GraphError::UnknownPredecessor {
                    node: id,
                    predecessor: *pred,
                });
            }
        }
        let mut kinds: FxHashSet<ActionKind> = FxHashSet::default();
        for action in &actions {
            if !kinds.insert(action.kind()) {
                return Err(GraphError::DuplicateAction {
                    node: id,
                    kind: action.kind(),
                });
            }
        }
        self.nodes.push(FlowNode {
            id,
            display_name: display_name.into(),
            role,
            predecessors: predecessors.to_vec(),
            actions,
        });
        Ok(id)
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: FlowNodeId) -> Option<&FlowNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Number of nodes appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no nodes have been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates nodes in append order.
    pub fn nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes.iter()
    }

    /// Current head nodes: nodes no later node names as a predecessor.
    ///
    /// A completed linear run has one head (its tip); a run paused inside
    /// a parallel construct has one head per live branch. Heads are the
    /// natural frontier to hand to
    /// [`ForkScanner::scan`](crate::scanner::ForkScanner::scan).
    #[must_use]
    pub fn heads(&self) -> Vec<FlowNodeId> {
        let mut referenced: FxHashSet<FlowNodeId> = FxHashSet::default();
        for node in &self.nodes {
            referenced.extend(node.predecessors().iter().copied());
        }
        self.nodes
            .iter()
            .map(FlowNode::id)
            .filter(|id| !referenced.contains(id))
            .collect()
    }
}

/// Errors raised while appending to a [`FlowGraph`].
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    /// A predecessor id does not name an existing node.
    #[error("node {node} names unknown predecessor {predecessor}")]
    #[diagnostic(
        code(flowscan::graph::unknown_predecessor),
        help("Predecessors must be appended before their successors; the graph is append-only.")
    )]
    UnknownPredecessor {
        node: FlowNodeId,
        predecessor: FlowNodeId,
    },

    /// Two actions of the same kind were supplied for one node.
    #[error("node {node} carries more than one {kind:?} action")]
    #[diagnostic(
        code(flowscan::graph::duplicate_action),
        help("A node holds at most one persistent action of each kind.")
    )]
    DuplicateAction { node: FlowNodeId, kind: ActionKind },
}
