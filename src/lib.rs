//! # Flowscan: Flow-graph Chunk Analysis
//!
//! Flowscan reconstructs higher-level execution semantics from the
//! low-level, append-only graph a pipeline run leaves behind. It walks
//! nested blocks and parallel fork/join structure, partitions the run
//! into contiguous logical chunks (stages), and classifies individual
//! nodes against external scheduling evidence.
//!
//! ## Core Concepts
//!
//! - **Flow nodes**: Immutable records of execution steps, each with a
//!   structural role and optional persistent facts
//! - **Fork scanner**: Traversal engine resolving the graph into a
//!   deterministic stream of visitor callbacks
//! - **Chunk visitors**: The eight-callback extension point all
//!   consumers build on
//! - **Queue correlation**: Per-node lifecycle classification against
//!   the external scheduler's queue
//!
//! ## Quick Start
//!
//! ### Scanning a run into chunks
//!
//! ```
//! use flowscan::chunks::{CollectingHandler, LinearChunkVisitor};
//! use flowscan::graph::FlowGraph;
//! use flowscan::scanner::ForkScanner;
//! use flowscan::types::NodeRole;
//!
//! let mut graph = FlowGraph::new();
//! let root = graph.append(NodeRole::Atom, "start", &[]).unwrap();
//! let open = graph.append(NodeRole::BlockStart, "build", &[root]).unwrap();
//! let step = graph.append(NodeRole::Atom, "compile", &[open]).unwrap();
//! let close = graph.append(NodeRole::BlockEnd, "build end", &[step]).unwrap();
//! let _tip = graph.append(NodeRole::Atom, "done", &[close]).unwrap();
//!
//! let mut visitor = LinearChunkVisitor::new(CollectingHandler::new());
//! ForkScanner::new(&graph)
//!     .scan(&graph.heads(), &mut visitor)
//!     .unwrap();
//! visitor.flush();
//!
//! let chunks = visitor.into_handler().into_chunks();
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].first_node, Some(open));
//! ```
//!
//! ### Classifying a node against the queue
//!
//! ```
//! use flowscan::actions::Action;
//! use flowscan::graph::FlowGraph;
//! use flowscan::queue::{
//!     derive_state, MemoryQueue, QueueItem, QueueItemRef, QueueState,
//! };
//! use flowscan::types::NodeRole;
//!
//! let mut queue = MemoryQueue::new();
//! let item_ref = queue.enqueue(QueueItem::new(QueueItemRef(1), "deploy"));
//!
//! let mut graph = FlowGraph::new();
//! let node = graph
//!     .append_with_actions(
//!         NodeRole::Atom,
//!         "deploy",
//!         &[],
//!         vec![Action::QueueCorrelation(item_ref)],
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     derive_state(graph.node(node).unwrap(), &queue),
//!     QueueState::Queued
//! );
//!
//! // The classification is recomputed on every call: once the item
//! // departs by being dispatched, a fresh call observes it.
//! queue.depart(item_ref, false);
//! assert_eq!(
//!     derive_state(graph.node(node).unwrap(), &queue),
//!     QueueState::Launched
//! );
//! ```
//!
//! ## Module Guide
//!
//! - [`types`] - Node identifiers and structural roles
//! - [`actions`] - Persistent facts attached to nodes
//! - [`graph`] - The append-only flow graph
//! - [`visitor`] - Chunk visitor contract and chunk values
//! - [`scanner`] - Fork-aware traversal engine
//! - [`chunks`] - Reference single-window chunk accumulator
//! - [`queue`] - Queue-state correlation
//! - [`telemetry`] - Tracing subscriber setup for embedders

pub mod actions;
pub mod chunks;
pub mod graph;
pub mod queue;
pub mod scanner;
pub mod telemetry;
pub mod types;
pub mod visitor;
