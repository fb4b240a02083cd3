use std::{cmp::Ordering, collections::BinaryHeap};

use hashbrown::HashMap;
use ordered_float::OrderedFloat;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::Error;
use crate::model::RouteGraph;

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: OrderedFloat<f64>,
    node: NodeIndex,
}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap)
        other.cost.cmp(&self.cost)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-pair Dijkstra over the node graph.
///
/// Returns the traversed edges in order plus the total accumulated
/// weight. Equal-cost relaxations prefer the lower edge index so results
/// are deterministic.
pub(super) fn shortest_edge_path(
    graph: &RouteGraph,
    start: NodeIndex,
    target: NodeIndex,
) -> Result<(Vec<EdgeIndex>, f64), Error> {
    let estimated_nodes = graph.node_count().min(1000);
    let mut distances: HashMap<NodeIndex, OrderedFloat<f64>> =
        HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> =
        HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    // Guard against malformed graphs: the relaxation loop is bounded
    // even if the heap keeps producing stale entries
    let max_iterations = (graph.node_count() + graph.edge_count() + 1) * 8;
    let mut iterations = 0usize;

    heap.push(State {
        cost: OrderedFloat(0.0),
        node: start,
    });
    distances.insert(start, OrderedFloat(0.0));

    while let Some(State { cost, node }) = heap.pop() {
        iterations += 1;
        if iterations > max_iterations {
            break;
        }

        if node == target {
            break;
        }

        // Skip if we've found a better path
        if let Some(&best) = distances.get(&node)
            && cost > best
        {
            continue;
        }

        for edge in graph.graph.edges(node) {
            let next = edge.target();
            let next_cost = OrderedFloat(cost.0 + edge.weight().weight);

            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    predecessors.insert(next, (node, edge.id()));
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    let better = next_cost < *entry.get()
                        || (next_cost == *entry.get()
                            && predecessors
                                .get(&next)
                                .is_some_and(|(_, prev_edge)| edge.id() < *prev_edge));
                    if better {
                        *entry.get_mut() = next_cost;
                        predecessors.insert(next, (node, edge.id()));
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    let total = distances.get(&target).copied().ok_or(Error::NoPath)?;

    // Follow predecessors backward from target to start
    let mut edges = Vec::new();
    let mut current = target;
    while current != start {
        let (previous, edge) = predecessors.get(&current).copied().ok_or(Error::NoPath)?;
        edges.push(edge);
        current = previous;
    }
    edges.reverse();

    Ok((edges, total.0))
}
