//! Serializable form of a built graph
//!
//! Persistence itself is the caller's concern; the contract here is that
//! a graph restored from its snapshot reproduces identical solve
//! behavior (same nodes, edges and weights).

use geo::{Coord, LineString, Point};
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};

use super::graph::{Direction, RouteEdge, RouteGraph, RouteNode};
use crate::{Error, SegmentId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Node coordinates as `[lon, lat]`, in node index order.
    pub nodes: Vec<[f64; 2]>,
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub segment_id: SegmentId,
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
    pub length_m: f64,
    pub coverage: f64,
    pub weight: f64,
    /// Oriented polyline as `[lon, lat]` pairs.
    pub geometry: Vec<[f64; 2]>,
}

impl RouteGraph {
    pub fn to_snapshot(&self) -> GraphSnapshot {
        let nodes = self
            .graph
            .node_indices()
            .map(|node| {
                let point = self.graph[node].geometry;
                [point.x(), point.y()]
            })
            .collect();

        let edges = self
            .graph
            .edge_indices()
            .filter_map(|edge| {
                let (from, to) = self.graph.edge_endpoints(edge)?;
                let weight = self.graph.edge_weight(edge)?;
                Some(EdgeSnapshot {
                    segment_id: weight.segment_id,
                    from: from.index(),
                    to: to.index(),
                    direction: weight.direction,
                    length_m: weight.length_m,
                    coverage: weight.coverage,
                    weight: weight.weight,
                    geometry: weight.geometry.coords().map(|c| [c.x, c.y]).collect(),
                })
            })
            .collect();

        GraphSnapshot { nodes, edges }
    }

    /// Rebuilds a graph from its snapshot, including the spatial snap
    /// index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] when an edge references a node
    /// index outside the snapshot's node list.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Result<Self, Error> {
        let mut graph = DiGraph::with_capacity(snapshot.nodes.len(), snapshot.edges.len());

        let nodes: Vec<_> = snapshot
            .nodes
            .iter()
            .map(|&[lon, lat]| {
                graph.add_node(RouteNode {
                    geometry: Point::new(lon, lat),
                })
            })
            .collect();

        for edge in &snapshot.edges {
            let (from, to) = nodes
                .get(edge.from)
                .zip(nodes.get(edge.to))
                .ok_or_else(|| {
                    Error::InvalidData(format!(
                        "edge for segment {} references missing node {} or {}",
                        edge.segment_id, edge.from, edge.to
                    ))
                })?;

            let geometry: LineString<f64> = edge
                .geometry
                .iter()
                .map(|&[lon, lat]| Coord { x: lon, y: lat })
                .collect();

            graph.add_edge(
                *from,
                *to,
                RouteEdge {
                    segment_id: edge.segment_id,
                    direction: edge.direction,
                    length_m: edge.length_m,
                    coverage: edge.coverage,
                    weight: edge.weight,
                    geometry,
                },
            );
        }

        Ok(Self::new(graph))
    }
}
