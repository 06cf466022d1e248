//! Core identifier and role types for the flowscan analysis framework.
//!
//! This module defines the fundamental types used throughout the crate
//! for identifying nodes in a recorded flow graph and classifying the
//! structural role each node plays.
//!
//! # Key Types
//!
//! - [`FlowNodeId`]: Stable identifier for one node within a run
//! - [`NodeRole`]: Structural discriminator (atom, block/parallel boundary)
//!
//! # Examples
//!
//! ```rust
//! use flowscan::types::{FlowNodeId, NodeRole};
//!
//! let id = FlowNodeId(4);
//! assert_eq!(id.to_string(), "4");
//!
//! let role = NodeRole::BlockStart;
//! assert!(role.is_block_boundary());
//! assert!(!role.is_atom());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a node within one pipeline run.
///
/// Ids are assigned in append order by the owning [`FlowGraph`](crate::graph::FlowGraph),
/// so ordering two ids compares their creation order. Ids are only
/// meaningful within the run that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowNodeId(pub u64);

impl fmt::Display for FlowNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for FlowNodeId {
    fn from(raw: u64) -> Self {
        FlowNodeId(raw)
    }
}

/// Structural role of a node within the recorded execution graph.
///
/// Every node carries exactly one role. Roles drive the
/// [`ForkScanner`](crate::scanner::ForkScanner)'s callback dispatch:
/// block boundaries produce chunk callbacks, parallel boundaries produce
/// parallel callbacks, and everything else is visited as an atom.
///
/// # Examples
///
/// ```rust
/// use flowscan::types::NodeRole;
///
/// assert!(NodeRole::Atom.is_atom());
/// assert!(NodeRole::ParallelFork.is_parallel_boundary());
/// assert_eq!(NodeRole::BranchEnd.to_string(), "branch-end");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    /// A plain execution step with no structural significance.
    Atom,

    /// Opens a logical block (e.g. a stage). Matched by a later
    /// [`BlockEnd`](Self::BlockEnd), unless the run is still inside the block.
    BlockStart,

    /// Closes the innermost open logical block.
    BlockEnd,

    /// Fork point of a parallel construct. Its successors are the
    /// [`BranchStart`](Self::BranchStart) nodes of the individual branches.
    ParallelFork,

    /// Join point of a parallel construct. Its predecessors are the
    /// [`BranchEnd`](Self::BranchEnd) nodes of all branches.
    ParallelJoin,

    /// Opens one concurrent branch of a parallel construct.
    BranchStart,

    /// Closes one concurrent branch of a parallel construct.
    BranchEnd,
}

impl NodeRole {
    /// Returns `true` for [`Atom`](Self::Atom) nodes.
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(self, Self::Atom)
    }

    /// Returns `true` for block-start/block-end boundary nodes.
    #[must_use]
    pub fn is_block_boundary(&self) -> bool {
        matches!(self, Self::BlockStart | Self::BlockEnd)
    }

    /// Returns `true` for any node belonging to parallel structure
    /// (fork, join, or branch boundaries).
    #[must_use]
    pub fn is_parallel_boundary(&self) -> bool {
        matches!(
            self,
            Self::ParallelFork | Self::ParallelJoin | Self::BranchStart | Self::BranchEnd
        )
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Atom => "atom",
            Self::BlockStart => "block-start",
            Self::BlockEnd => "block-end",
            Self::ParallelFork => "parallel-fork",
            Self::ParallelJoin => "parallel-join",
            Self::BranchStart => "branch-start",
            Self::BranchEnd => "branch-end",
        };
        write!(f, "{name}")
    }
}
