//! Turn-penalty-aware search.
//!
//! Turn costs depend on the pair of edges meeting at a node, so the
//! search state is `(node, incoming edge)` rather than the node alone -
//! two arrivals at the same node through different edges are distinct
//! states with distinct onward costs.

use std::{cmp::Ordering, collections::BinaryHeap};

use geo::{Bearing, Haversine, Point};
use hashbrown::HashMap;
use ordered_float::OrderedFloat;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::TurnPenalties;
use crate::error::Error;
use crate::model::{RouteEdge, RouteGraph};

/// Search state: where we are and which edge we arrived through.
/// `incoming` is `None` only at the origin.
type EdgeState = (NodeIndex, Option<EdgeIndex>);

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: OrderedFloat<f64>,
    node: NodeIndex,
    incoming: Option<EdgeIndex>,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap).
        // Equal-cost states pop in lowest-incoming-edge order so the
        // first settled target state is deterministic.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.incoming.cmp(&self.incoming))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub(super) fn shortest_edge_path(
    graph: &RouteGraph,
    start: NodeIndex,
    target: NodeIndex,
    penalties: &TurnPenalties,
) -> Result<(Vec<EdgeIndex>, f64), Error> {
    let mut distances: HashMap<EdgeState, OrderedFloat<f64>> = HashMap::new();
    let mut predecessors: HashMap<EdgeState, (EdgeState, EdgeIndex)> = HashMap::new();
    let mut heap = BinaryHeap::new();

    let max_iterations = (graph.node_count() + graph.edge_count() + 1) * 8;
    let mut iterations = 0usize;

    let origin: EdgeState = (start, None);
    heap.push(State {
        cost: OrderedFloat(0.0),
        node: start,
        incoming: None,
    });
    distances.insert(origin, OrderedFloat(0.0));

    let mut final_state: Option<EdgeState> = None;

    while let Some(State {
        cost,
        node,
        incoming,
    }) = heap.pop()
    {
        iterations += 1;
        if iterations > max_iterations {
            break;
        }

        // First settled state at the target is optimal
        if node == target {
            final_state = Some((node, incoming));
            break;
        }

        if let Some(&best) = distances.get(&(node, incoming))
            && cost > best
        {
            continue;
        }

        let incoming_bearing = incoming.and_then(|edge| arrival_bearing(graph, edge));

        for edge in graph.graph.edges(node) {
            let next = edge.target();
            let turn_cost = match (incoming_bearing, departure_bearing(edge.weight())) {
                (Some(inbound), Some(outbound)) => penalties.for_bearing_delta(outbound - inbound),
                _ => 0.0,
            };
            let next_cost = OrderedFloat(cost.0 + edge.weight().weight + turn_cost);
            let next_state: EdgeState = (next, Some(edge.id()));

            match distances.entry(next_state) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    predecessors.insert(next_state, ((node, incoming), edge.id()));
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                        incoming: Some(edge.id()),
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        predecessors.insert(next_state, ((node, incoming), edge.id()));
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                            incoming: Some(edge.id()),
                        });
                    }
                }
            }
        }
    }

    let final_state = final_state.ok_or(Error::NoPath)?;
    let total = distances.get(&final_state).copied().ok_or(Error::NoPath)?;

    let mut edges = Vec::new();
    let mut current = final_state;
    while current != origin {
        let (previous, edge) = predecessors.get(&current).copied().ok_or(Error::NoPath)?;
        edges.push(edge);
        current = previous;
    }
    edges.reverse();

    Ok((edges, total.0))
}

/// Heading of the last hop of an edge's oriented geometry, in degrees.
fn arrival_bearing(graph: &RouteGraph, edge: EdgeIndex) -> Option<f64> {
    let geometry = &graph.graph.edge_weight(edge)?.geometry;
    let count = geometry.0.len();
    if count < 2 {
        return None;
    }
    let from: Point<f64> = geometry.0[count - 2].into();
    let to: Point<f64> = geometry.0[count - 1].into();
    Some(Haversine.bearing(from, to))
}

/// Heading of the first hop of an edge's oriented geometry, in degrees.
fn departure_bearing(edge: &RouteEdge) -> Option<f64> {
    let geometry = &edge.geometry;
    if geometry.0.len() < 2 {
        return None;
    }
    let from: Point<f64> = geometry.0[0].into();
    let to: Point<f64> = geometry.0[1].into();
    Some(Haversine.bearing(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearing_delta_classification() {
        let penalties = TurnPenalties {
            left: 1.0,
            right: 2.0,
            sharp: 3.0,
            straight: 0.5,
        };
        assert_eq!(penalties.for_bearing_delta(5.0), 0.5);
        assert_eq!(penalties.for_bearing_delta(-20.0), 0.5);
        assert_eq!(penalties.for_bearing_delta(90.0), 2.0);
        assert_eq!(penalties.for_bearing_delta(-90.0), 1.0);
        assert_eq!(penalties.for_bearing_delta(170.0), 3.0);
        assert_eq!(penalties.for_bearing_delta(-170.0), 3.0);
        // Wrap-around: 350 degrees clockwise is a 10 degree left drift
        assert_eq!(penalties.for_bearing_delta(350.0), 0.5);
    }
}
