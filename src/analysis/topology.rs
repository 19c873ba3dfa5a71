use crate::graph::error::GraphError;
use crate::store::{NodeArena, NodeId};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use smallvec::SmallVec;
use std::collections::HashSet;

/// Builds the link graph reachable from `roots`. Edges point parent -> child.
///
/// A child linked twice from the same parent collapses to a single edge.
pub fn dependency_graph(store: &NodeArena, roots: &[NodeId]) -> DiGraphMap<NodeId, ()> {
    let mut graph = DiGraphMap::new();
    let mut visited = HashSet::new();
    let mut stack: SmallVec<[NodeId; 16]> = roots.iter().copied().collect();

    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        graph.add_node(node);
        if let Some(entry) = store.get(node) {
            for child in entry.node.links() {
                graph.add_edge(node, child, ());
                stack.push(child);
            }
        }
    }
    graph
}

/// Whether linking `child` under `parent` would make `parent` reachable from itself.
pub fn would_create_cycle(store: &NodeArena, parent: NodeId, child: NodeId) -> bool {
    parent == child || dependency_graph(store, &[child]).contains_node(parent)
}

/// Every node at or below `root`, children before the parents that link them.
pub fn dependency_order(store: &NodeArena, root: NodeId) -> Result<Vec<NodeId>, GraphError> {
    store.entry(root)?;
    let graph = dependency_graph(store, &[root]);
    let mut order = toposort(&graph, None).map_err(|cycle| GraphError::CycleDetected {
        parent: cycle.node_id(),
        child: cycle.node_id(),
    })?;
    order.reverse();
    Ok(order)
}
