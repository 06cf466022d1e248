//! Persistent facts ("actions") attached to flow nodes.
//!
//! Actions record durable evidence about a node that remains queryable
//! after the run completes. A node carries at most one action of each
//! [`ActionKind`]; the graph enforces this at append time.
//!
//! Three kinds matter to this crate:
//!
//! - [`Action::WorkspaceAssignment`]: the node's unit of work was handed
//!   to an execution agent. Its mere presence is the signal; the label is
//!   diagnostic.
//! - [`Action::QueueCorrelation`]: a reference, possibly stale, to the
//!   scheduler's queue item for this node. Consumed by
//!   [`queue::derive_state`](crate::queue::derive_state).
//! - [`Action::Pause`]: non-executing time recorded for the node, in
//!   milliseconds. Accumulated into chunks by visitor extensions such as
//!   [`CollectingHandler`](crate::chunks::CollectingHandler).
//!
//! # Examples
//!
//! ```rust
//! use flowscan::actions::{Action, ActionKind};
//! use flowscan::queue::QueueItemRef;
//!
//! let action = Action::QueueCorrelation(QueueItemRef(12));
//! assert_eq!(action.kind(), ActionKind::QueueCorrelation);
//! ```

use serde::{Deserialize, Serialize};

use crate::queue::QueueItemRef;

/// A durable, queryable fact attached to one flow node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// The node's work was dispatched to an execution agent.
    ///
    /// `node_label` names the agent/workspace for diagnostics; the queue
    /// correlator only cares that the assignment exists.
    WorkspaceAssignment {
        node_label: String,
    },

    /// Reference to the scheduling-queue item once recorded for this
    /// node. The referenced item is owned by the external scheduler and
    /// may no longer resolve.
    QueueCorrelation(QueueItemRef),

    /// Recorded non-executing (queued/waiting) time for this node.
    Pause {
        millis: u64,
    },
}

impl Action {
    /// The kind discriminator for this action.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::WorkspaceAssignment { .. } => ActionKind::WorkspaceAssignment,
            Action::QueueCorrelation(_) => ActionKind::QueueCorrelation,
            Action::Pause { .. } => ActionKind::Pause,
        }
    }
}

/// Discriminator for [`Action`] variants, used for kind-based lookup on
/// a node (`has_action` / `action`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    WorkspaceAssignment,
    QueueCorrelation,
    Pause,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let ws = Action::WorkspaceAssignment {
            node_label: "agent-7".into(),
        };
        assert_eq!(ws.kind(), ActionKind::WorkspaceAssignment);
        assert_eq!(
            Action::Pause { millis: 250 }.kind(),
            ActionKind::Pause
        );
    }
}
