//! Queue-state correlation: classifying one node's lifecycle against the
//! external scheduler.
//!
//! A node that went through scheduling carries two possible facts: a
//! [workspace assignment](crate::actions::Action::WorkspaceAssignment)
//! (an agent took the work) and a
//! [queue correlation](crate::actions::Action::QueueCorrelation) (a
//! reference into the scheduler's queue). [`derive_state`] folds those
//! facts plus a live [`QueueLookup`] into one coarse [`QueueState`].
//!
//! Absent evidence is never an error here: missing facts and
//! unresolvable references map to defined states (`Unknown`,
//! `Cancelled`). The classification is a point-in-time read of
//! externally mutated state — it can be stale the moment it returns,
//! and callers wanting a fresh answer simply call again. Nothing is
//! cached.
//!
//! # Examples
//!
//! ```rust
//! use flowscan::graph::FlowGraph;
//! use flowscan::queue::{derive_state, MemoryQueue, QueueState};
//! use flowscan::types::NodeRole;
//!
//! let mut graph = FlowGraph::new();
//! let node = graph.append(NodeRole::Atom, "build", &[]).unwrap();
//!
//! let queue = MemoryQueue::new();
//! let state = derive_state(graph.node(node).unwrap(), &queue);
//! assert_eq!(state, QueueState::Unknown);
//! ```

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::graph::FlowNode;

/// Coarse lifecycle state of one node with respect to scheduling.
///
/// Derived on every call, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueueState {
    /// The correlated queue item is still waiting for an agent.
    Queued,
    /// The item left the queue without the work ever being dispatched.
    Cancelled,
    /// An agent took the work (workspace assigned, or the item departed
    /// by being launched).
    Launched,
    /// No scheduling evidence was ever recorded for this node.
    Unknown,
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Queued => "queued",
            Self::Cancelled => "cancelled",
            Self::Launched => "launched",
            Self::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// Stored reference to a scheduler queue item. May be stale: the
/// scheduler owns item lifecycle and recycles departed records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueItemRef(pub u64);

impl fmt::Display for QueueItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The scheduler's record of work waiting for (or recently matched to)
/// an execution agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: QueueItemRef,
    pub task_name: String,
    pub enqueued_at: DateTime<Utc>,
}

impl QueueItem {
    pub fn new(id: QueueItemRef, task_name: impl Into<String>) -> Self {
        Self {
            id,
            task_name: task_name.into(),
            enqueued_at: Utc::now(),
        }
    }
}

/// A queue item as observed at resolution time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ResolvedItem {
    /// Still in the queue, not yet departed.
    Active(QueueItem),
    /// Left the queue; `cancelled` distinguishes a cancellation from a
    /// dispatch.
    Departed { item: QueueItem, cancelled: bool },
}

impl ResolvedItem {
    /// The underlying item regardless of departure state.
    #[must_use]
    pub fn item(&self) -> &QueueItem {
        match self {
            Self::Active(item) | Self::Departed { item, .. } => item,
        }
    }
}

/// Read-only resolution surface onto the external scheduler's queue.
///
/// `None` covers both "never existed" and "existed but was recycled" —
/// the correlator treats staleness identically to absence.
pub trait QueueLookup {
    fn resolve(&self, item_ref: QueueItemRef) -> Option<ResolvedItem>;
}

/// Derives the current [`QueueState`] for one node.
///
/// Decision table, in order:
///
/// 1. Workspace assignment present → [`Launched`](QueueState::Launched)
///    (queue status is moot once an agent has the work).
/// 2. No queue-correlation fact → [`Unknown`](QueueState::Unknown).
/// 3. Reference does not resolve → [`Cancelled`](QueueState::Cancelled).
/// 4. Departed, cancelled → [`Cancelled`](QueueState::Cancelled).
/// 5. Departed, not cancelled → [`Launched`](QueueState::Launched).
/// 6. Still active → [`Queued`](QueueState::Queued).
#[must_use]
pub fn derive_state(node: &FlowNode, queue: &impl QueueLookup) -> QueueState {
    if node.workspace_assignment().is_some() {
        return QueueState::Launched;
    }
    let Some(item_ref) = node.queue_correlation() else {
        return QueueState::Unknown;
    };
    match queue.resolve(item_ref) {
        // The item left the queue completely and no workspace was ever
        // assigned.
        None => QueueState::Cancelled,
        Some(ResolvedItem::Departed { cancelled: true, .. }) => QueueState::Cancelled,
        Some(ResolvedItem::Departed { cancelled: false, .. }) => QueueState::Launched,
        Some(ResolvedItem::Active(_)) => QueueState::Queued,
    }
}

/// The raw resolved queue item for a node, without classification.
///
/// `None` when the node carries no queue-correlation fact or the
/// reference no longer resolves.
#[must_use]
pub fn current_queue_item(node: &FlowNode, queue: &impl QueueLookup) -> Option<ResolvedItem> {
    queue.resolve(node.queue_correlation()?)
}

/// In-memory [`QueueLookup`] for embedding and tests.
///
/// Mutators model the scheduler's item lifecycle: [`enqueue`](Self::enqueue)
/// an active item, [`depart`](Self::depart) it (cancelled or launched),
/// [`remove`](Self::remove) it entirely once the departure record is
/// recycled.
#[derive(Clone, Debug, Default)]
pub struct MemoryQueue {
    items: FxHashMap<QueueItemRef, ResolvedItem>,
}

impl MemoryQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an active item, returning its reference.
    pub fn enqueue(&mut self, item: QueueItem) -> QueueItemRef {
        let item_ref = item.id;
        self.items.insert(item_ref, ResolvedItem::Active(item));
        item_ref
    }

    /// Marks an item as departed. No-op for unknown references.
    pub fn depart(&mut self, item_ref: QueueItemRef, cancelled: bool) {
        if let Some(resolved) = self.items.remove(&item_ref) {
            let item = resolved.item().clone();
            self.items
                .insert(item_ref, ResolvedItem::Departed { item, cancelled });
        }
    }

    /// Drops an item entirely, as the scheduler does when recycling a
    /// departure record.
    pub fn remove(&mut self, item_ref: QueueItemRef) {
        self.items.remove(&item_ref);
    }
}

impl QueueLookup for MemoryQueue {
    fn resolve(&self, item_ref: QueueItemRef) -> Option<ResolvedItem> {
        self.items.get(&item_ref).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_queue_lifecycle() {
        let mut queue = MemoryQueue::new();
        let item_ref = queue.enqueue(QueueItem::new(QueueItemRef(5), "deploy"));

        assert!(matches!(
            queue.resolve(item_ref),
            Some(ResolvedItem::Active(_))
        ));

        queue.depart(item_ref, false);
        assert!(matches!(
            queue.resolve(item_ref),
            Some(ResolvedItem::Departed { cancelled: false, .. })
        ));

        queue.remove(item_ref);
        assert!(queue.resolve(item_ref).is_none());
    }
}
