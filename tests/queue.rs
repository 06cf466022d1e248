use flowscan::actions::Action;
use flowscan::graph::{FlowGraph, FlowNode};
use flowscan::queue::{
    current_queue_item, derive_state, MemoryQueue, QueueItem, QueueItemRef, QueueState,
    ResolvedItem,
};
use flowscan::types::{FlowNodeId, NodeRole};

fn node_with(actions: Vec<Action>) -> (FlowGraph, FlowNodeId) {
    let mut graph = FlowGraph::new();
    let id = graph
        .append_with_actions(NodeRole::Atom, "step", &[], actions)
        .unwrap();
    (graph, id)
}

fn the_node(graph: &FlowGraph, id: FlowNodeId) -> &FlowNode {
    graph.node(id).unwrap()
}

#[test]
fn workspace_assignment_wins_over_any_queue_fact() {
    let mut queue = MemoryQueue::new();
    let item_ref = queue.enqueue(QueueItem::new(QueueItemRef(1), "build"));

    let (graph, id) = node_with(vec![
        Action::WorkspaceAssignment {
            node_label: "agent-1".into(),
        },
        Action::QueueCorrelation(item_ref),
    ]);
    assert_eq!(derive_state(the_node(&graph, id), &queue), QueueState::Launched);

    // Even a cancelled departure cannot override the assignment.
    queue.depart(item_ref, true);
    assert_eq!(derive_state(the_node(&graph, id), &queue), QueueState::Launched);
}

#[test]
fn no_evidence_at_all_is_unknown() {
    let queue = MemoryQueue::new();
    let (graph, id) = node_with(vec![]);
    assert_eq!(derive_state(the_node(&graph, id), &queue), QueueState::Unknown);
}

#[test]
fn unresolvable_reference_is_cancelled() {
    let queue = MemoryQueue::new();
    let (graph, id) = node_with(vec![Action::QueueCorrelation(QueueItemRef(99))]);
    assert_eq!(derive_state(the_node(&graph, id), &queue), QueueState::Cancelled);
}

#[test]
fn item_lifecycle_reclassifies_on_each_call() {
    let mut queue = MemoryQueue::new();
    let item_ref = queue.enqueue(QueueItem::new(QueueItemRef(7), "test"));
    let (graph, id) = node_with(vec![Action::QueueCorrelation(item_ref)]);

    assert_eq!(derive_state(the_node(&graph, id), &queue), QueueState::Queued);

    queue.depart(item_ref, true);
    assert_eq!(derive_state(the_node(&graph, id), &queue), QueueState::Cancelled);
}

#[test]
fn departed_by_dispatch_is_launched() {
    let mut queue = MemoryQueue::new();
    let item_ref = queue.enqueue(QueueItem::new(QueueItemRef(7), "test"));
    let (graph, id) = node_with(vec![Action::QueueCorrelation(item_ref)]);

    queue.depart(item_ref, false);
    assert_eq!(derive_state(the_node(&graph, id), &queue), QueueState::Launched);

    // Once the departure record is recycled, the reference is stale and
    // classification falls back to cancelled.
    queue.remove(item_ref);
    assert_eq!(derive_state(the_node(&graph, id), &queue), QueueState::Cancelled);
}

#[test]
fn current_queue_item_exposes_the_raw_resolution() {
    let mut queue = MemoryQueue::new();
    let item_ref = queue.enqueue(QueueItem::new(QueueItemRef(3), "deploy"));
    let (graph, id) = node_with(vec![Action::QueueCorrelation(item_ref)]);

    match current_queue_item(the_node(&graph, id), &queue) {
        Some(ResolvedItem::Active(item)) => {
            assert_eq!(item.id, item_ref);
            assert_eq!(item.task_name, "deploy");
        }
        other => panic!("expected an active item, got {other:?}"),
    }

    let (graph, bare) = node_with(vec![]);
    assert!(current_queue_item(the_node(&graph, bare), &queue).is_none());
}

#[test]
fn queue_state_serializes_stably() {
    let json = serde_json::to_string(&QueueState::Cancelled).unwrap();
    assert_eq!(json, "\"Cancelled\"");
    let back: QueueState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, QueueState::Cancelled);
}
