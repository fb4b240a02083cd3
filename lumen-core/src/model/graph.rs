//! The built route graph: petgraph topology plus a spatial snap index

use geo::{Distance, Haversine, LineString, Point};
use petgraph::graph::{DiGraph, NodeIndex};
use rstar::{AABB, PointDistance, RTree, RTreeObject};
use serde::{Deserialize, Serialize};

use crate::{Error, SegmentId};

/// Traversal orientation of an edge relative to its source segment's
/// vertex order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

/// Graph node: a merged group of segment endpoints.
#[derive(Debug, Clone)]
pub struct RouteNode {
    /// Centroid of the merged endpoint group, `(lon, lat)`.
    pub geometry: Point<f64>,
}

/// Graph edge: one traversal direction of a road segment.
#[derive(Debug, Clone)]
pub struct RouteEdge {
    pub segment_id: SegmentId,
    pub direction: Direction,
    pub length_m: f64,
    /// Attribute coverage in `[0, 1]` assigned during attribution.
    pub coverage: f64,
    pub weight: f64,
    /// Segment polyline oriented in traversal direction.
    pub geometry: LineString<f64>,
}

/// Entry stored in the spatial snap index: a `[lon, lat]` point with the
/// associated graph node.
#[derive(Debug, Clone)]
pub(crate) struct IndexedPoint {
    pub(crate) point: [f64; 2],
    pub(crate) node: NodeIndex,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexedPoint {
    // Squared euclidean distance in lon/lat space. Nearest-in-degrees is
    // near enough to nearest-in-meters at city scale; exact metric
    // distances are recomputed with haversine afterwards.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Weighted road graph, immutable after construction.
///
/// Built once by [`build_route_graph`](crate::building::build_route_graph)
/// and queried many times; a rebuild replaces the whole value rather than
/// patching it.
pub struct RouteGraph {
    pub(crate) graph: DiGraph<RouteNode, RouteEdge>,
    pub(crate) spatial_index: RTree<IndexedPoint>,
}

impl RouteGraph {
    pub(crate) fn new(graph: DiGraph<RouteNode, RouteEdge>) -> Self {
        let entries = graph
            .node_indices()
            .map(|node| {
                let point = graph[node].geometry;
                IndexedPoint {
                    point: [point.x(), point.y()],
                    node,
                }
            })
            .collect();

        Self {
            graph,
            spatial_index: RTree::bulk_load(entries),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node_point(&self, node: NodeIndex) -> Point<f64> {
        self.graph[node].geometry
    }

    /// Nearest graph node to `point` with its haversine distance in
    /// meters. `None` only when the graph has no nodes.
    pub fn nearest_node(&self, point: &Point<f64>) -> Option<(NodeIndex, f64)> {
        let entry = self.spatial_index.nearest_neighbor(&[point.x(), point.y()])?;
        let node_point = self.graph[entry.node].geometry;
        Some((entry.node, Haversine.distance(*point, node_point)))
    }

    /// Snaps a query coordinate onto the nearest graph node.
    ///
    /// `max_radius_m` bounds the search; `0` means unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoNodeInRange`] when the nearest node is farther
    /// than `max_radius_m`, or when the graph is empty.
    pub fn snap(&self, point: &Point<f64>, max_radius_m: f64) -> Result<NodeIndex, Error> {
        let (node, distance_m) = self.nearest_node(point).ok_or(Error::NoNodeInRange {
            distance_m: f64::INFINITY,
            max_radius_m,
        })?;

        if max_radius_m > 0.0 && distance_m > max_radius_m {
            return Err(Error::NoNodeInRange {
                distance_m,
                max_radius_m,
            });
        }

        Ok(node)
    }
}
