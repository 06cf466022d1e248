//! Reference single-window chunk accumulator.
//!
//! [`LinearChunkVisitor`] is the minimal stateful implementation of the
//! [`ChunkVisitor`](crate::visitor::ChunkVisitor) contract: it tracks
//! exactly one in-flight [`FlowChunk`] window and hands each finished
//! chunk to a [`LinearChunkHandler`].
//!
//! Closing is lazy. `chunk_start` first closes out the previous window
//! (handing its accumulated data to the handler), then opens the new
//! one; `chunk_end` only records the window's far boundary. The final
//! chunk of a traversal therefore stays in flight until the caller
//! invokes [`flush`](LinearChunkVisitor::flush). The very first
//! `chunk_start` of a traversal closes a window that was never opened,
//! so handlers always receive one [empty](crate::visitor::FlowChunk::is_empty)
//! chunk up front and must treat it as "nothing to record".
//!
//! The handler receives an owned snapshot of the finished chunk, so
//! storing it requires no defensive copy.
//!
//! # Limitation
//!
//! Only one window is tracked: nested blocks and parallel branches are
//! not resolved into separate chunks, and all four parallel callbacks
//! are ignored. This visitor is correct only for flat sequences of
//! top-level blocks. Consumers needing nesting or parallel awareness
//! should keep a stack of chunks keyed by depth (and a map keyed by
//! [`ScanContext::current_branch`](crate::visitor::ScanContext::current_branch)
//! for branches), built on the same eight-callback contract.
//!
//! # Examples
//!
//! ```rust
//! use flowscan::chunks::{CollectingHandler, LinearChunkVisitor};
//! use flowscan::graph::FlowGraph;
//! use flowscan::scanner::ForkScanner;
//! use flowscan::types::NodeRole;
//!
//! let mut graph = FlowGraph::new();
//! let root = graph.append(NodeRole::Atom, "start", &[]).unwrap();
//! let open = graph.append(NodeRole::BlockStart, "stage", &[root]).unwrap();
//! let work = graph.append(NodeRole::Atom, "work", &[open]).unwrap();
//! let close = graph.append(NodeRole::BlockEnd, "stage end", &[work]).unwrap();
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
//! assert_eq!(chunks[0].last_node, Some(close));
//! ```

use crate::graph::FlowNode;
use crate::visitor::{ChunkVisitor, FlowChunk, ScanContext};

/// Extension seam of the reference accumulator.
///
/// Both methods default to no-ops; implement `chunk_done` to capture
/// finished chunks and `atom` to accumulate per-node data into the
/// in-flight window before it closes.
pub trait LinearChunkHandler {
    /// Called each time a chunk window closes, with an owned snapshot of
    /// its accumulated data. The first call of every traversal receives
    /// an empty chunk; check [`FlowChunk::is_empty`].
    fn chunk_done(&mut self, chunk: FlowChunk) {
        let _ = chunk;
    }

    /// Called for every atom node, with mutable access to the in-flight
    /// chunk for per-node accumulation (timing, counts).
    fn atom(
        &mut self,
        chunk: &mut FlowChunk,
        before: Option<&FlowNode>,
        node: &FlowNode,
        after: Option<&FlowNode>,
        ctx: &ScanContext,
    ) {
        let _ = (chunk, before, node, after, ctx);
    }
}

/// Single-window visitor: one reusable chunk, lazily closed.
///
/// Not safe to share across simultaneous traversals; use one instance
/// per scan.
#[derive(Debug, Default)]
pub struct LinearChunkVisitor<H> {
    chunk: FlowChunk,
    handler: H,
}

impl<H: LinearChunkHandler> LinearChunkVisitor<H> {
    /// Wraps `handler` with a fresh, empty window.
    pub fn new(handler: H) -> Self {
        Self {
            chunk: FlowChunk::new(),
            handler,
        }
    }

    /// The in-flight chunk as accumulated so far.
    #[must_use]
    pub fn current_chunk(&self) -> &FlowChunk {
        &self.chunk
    }

    /// Closes out the in-flight chunk, handing it to the handler.
    ///
    /// Call after traversal ends to deliver the final chunk; the scanner
    /// itself never closes the last window.
    pub fn flush(&mut self) {
        let done = std::mem::take(&mut self.chunk);
        self.handler.chunk_done(done);
    }

    /// Borrow the handler (e.g. to inspect collected chunks mid-scan).
    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Consumes the visitor, returning its handler.
    pub fn into_handler(self) -> H {
        self.handler
    }
}

impl<H: LinearChunkHandler> ChunkVisitor for LinearChunkVisitor<H> {
    /// Finish the old chunk, then open the new one.
    fn chunk_start(&mut self, start: &FlowNode, before_block: Option<&FlowNode>, _ctx: &ScanContext) {
        let done = std::mem::take(&mut self.chunk);
        self.handler.chunk_done(done);
        self.chunk.first_node = Some(start.id());
        self.chunk.node_before = before_block.map(FlowNode::id);
    }

    fn chunk_end(&mut self, end: &FlowNode, after_chunk: Option<&FlowNode>, _ctx: &ScanContext) {
        self.chunk.last_node = Some(end.id());
        self.chunk.node_after = after_chunk.map(FlowNode::id);
    }

    fn atom_node(
        &mut self,
        before: Option<&FlowNode>,
        node: &FlowNode,
        after: Option<&FlowNode>,
        ctx: &ScanContext,
    ) {
        self.handler.atom(&mut self.chunk, before, node, after, ctx);
    }

    // Parallel structure is deliberately ignored: single window only.
}

/// Handler that keeps every non-empty finished chunk and accumulates
/// recorded pause time into the in-flight window.
///
/// The common base for report builders, and the workhorse of the test
/// suite.
#[derive(Debug, Default)]
pub struct CollectingHandler {
    chunks: Vec<FlowChunk>,
}

impl CollectingHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished chunks in the order they closed.
    #[must_use]
    pub fn chunks(&self) -> &[FlowChunk] {
        &self.chunks
    }

    /// Consumes the handler, returning the collected chunks.
    #[must_use]
    pub fn into_chunks(self) -> Vec<FlowChunk> {
        self.chunks
    }
}

impl LinearChunkHandler for CollectingHandler {
    fn chunk_done(&mut self, chunk: FlowChunk) {
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    fn atom(
        &mut self,
        chunk: &mut FlowChunk,
        _before: Option<&FlowNode>,
        node: &FlowNode,
        _after: Option<&FlowNode>,
        _ctx: &ScanContext,
    ) {
        chunk.pause_millis += node.pause_millis();
    }
}
