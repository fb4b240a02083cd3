//! Solved route: ordered legs, concatenated geometry, total weight

use geo::{Coord, LineString, Point};
use geojson::{Feature, Geometry, GeometryValue, JsonObject};
use petgraph::graph::EdgeIndex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::model::{Direction, RouteGraph};
use crate::SegmentId;

/// One traversed segment with its traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathLeg {
    pub segment_id: SegmentId,
    pub direction: Direction,
}

/// Result of a single solve call. Produced once, owned by the caller;
/// the graph retains nothing.
#[derive(Debug, Clone)]
pub struct RoutePath {
    pub legs: Vec<PathLeg>,
    /// Traversal-ordered polyline over all constituent segments.
    pub geometry: LineString<f64>,
    pub total_weight: f64,
}

impl RoutePath {
    /// Zero-weight path for queries whose endpoints snap to one node.
    pub(super) fn single_node(point: Point<f64>) -> Self {
        Self {
            legs: Vec::new(),
            geometry: LineString::new(vec![point.into()]),
            total_weight: 0.0,
        }
    }

    /// Reconstructs the path from traversed edges, concatenating their
    /// oriented geometries and dropping duplicate joint vertices.
    pub(super) fn from_edges(graph: &RouteGraph, edges: &[EdgeIndex], total_weight: f64) -> Self {
        let mut legs = Vec::with_capacity(edges.len());
        let mut coords: Vec<Coord<f64>> = Vec::new();

        for &edge in edges {
            let weight = &graph.graph[edge];
            legs.push(PathLeg {
                segment_id: weight.segment_id,
                direction: weight.direction,
            });

            let skip = usize::from(!coords.is_empty());
            coords.extend(weight.geometry.coords().skip(skip).copied());
        }

        Self {
            legs,
            geometry: LineString::new(coords),
            total_weight,
        }
    }

    /// Converts the path to a `GeoJSON` `Feature` with per-leg segment
    /// ids and the total weight as properties.
    pub fn to_geojson(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert("total_weight".into(), json!(self.total_weight));
        properties.insert(
            "segments".into(),
            json!(
                self.legs
                    .iter()
                    .map(|leg| leg.segment_id)
                    .collect::<Vec<_>>()
            ),
        );

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeometryValue::from(&self.geometry))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}
