//! Graph compilation: endpoint merging and edge emission

use geo::Point;
use hashbrown::HashMap;
use log::{info, warn};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use super::attribution::segment_coverage;
use super::config::GraphConfig;
use super::weight::{LengthDensityPolicy, WeightPolicy};
use crate::MIN_EDGE_WEIGHT;
use crate::error::Error;
use crate::model::{BeautySample, Direction, RouteEdge, RouteGraph, RouteNode, Segment};

/// Builds a route graph with the reference weight policy.
///
/// Deterministic: identical inputs and configuration produce identical
/// node order, edge order and weights. Degenerate segments (fewer than
/// two vertices) are skipped with a warning rather than failing the
/// whole build.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] when the configuration is
/// contradictory; no build work happens in that case.
pub fn build_route_graph(
    segments: &[Segment],
    samples: &[BeautySample],
    config: &GraphConfig,
) -> Result<RouteGraph, Error> {
    let policy = LengthDensityPolicy {
        penalty_scale: config.penalty_scale,
    };
    build_route_graph_with_policy(segments, samples, config, &policy)
}

/// Builds a route graph with a caller-supplied [`WeightPolicy`].
pub fn build_route_graph_with_policy(
    segments: &[Segment],
    samples: &[BeautySample],
    config: &GraphConfig,
    policy: &dyn WeightPolicy,
) -> Result<RouteGraph, Error> {
    config.validate()?;

    info!(
        "building route graph from {} segments and {} samples",
        segments.len(),
        samples.len()
    );

    let coverage = segment_coverage(segments, samples, config);

    // Keep only segments with usable geometry; skip-and-log the rest
    let mut kept: Vec<(&Segment, f64)> = Vec::with_capacity(segments.len());
    for (segment, coverage) in segments.iter().zip(coverage) {
        match segment.validate() {
            Ok(()) => kept.push((segment, coverage)),
            Err(e) => warn!("skipping segment: {e}"),
        }
    }

    let node_of_endpoint = merge_endpoints(&kept, config.merge_tolerance);
    let mut graph = DiGraph::new();
    let mut node_cache: HashMap<usize, NodeIndex> = HashMap::new();

    let mut resolve = |graph: &mut DiGraph<RouteNode, RouteEdge>, endpoint: usize| {
        let group = &node_of_endpoint[endpoint];
        *node_cache.entry(group.id).or_insert_with(|| {
            graph.add_node(RouteNode {
                geometry: group.centroid,
            })
        })
    };

    for (idx, (segment, coverage)) in kept.iter().enumerate() {
        let from = resolve(&mut graph, idx * 2);
        let to = resolve(&mut graph, idx * 2 + 1);

        let length_m = segment.length_m()?;
        let weight = clamp_weight(policy.edge_weight(segment, *coverage));

        graph.add_edge(
            from,
            to,
            RouteEdge {
                segment_id: segment.id,
                direction: Direction::Forward,
                length_m,
                coverage: *coverage,
                weight,
                geometry: segment.geometry.clone(),
            },
        );

        if !(config.directed && segment.oneway) {
            let mut reversed = segment.geometry.clone();
            reversed.0.reverse();
            graph.add_edge(
                to,
                from,
                RouteEdge {
                    segment_id: segment.id,
                    direction: Direction::Backward,
                    length_m,
                    coverage: *coverage,
                    weight,
                    geometry: reversed,
                },
            );
        }
    }

    info!(
        "route graph built: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    Ok(RouteGraph::new(graph))
}

/// Weights must stay positive and finite regardless of what the policy
/// returns for degenerate inputs.
fn clamp_weight(weight: f64) -> f64 {
    if weight.is_finite() {
        weight.max(MIN_EDGE_WEIGHT)
    } else {
        MIN_EDGE_WEIGHT
    }
}

/// Merged endpoint group: stable id plus the centroid of its members.
struct EndpointGroup {
    id: usize,
    centroid: Point<f64>,
}

#[derive(Clone)]
struct EndpointEntry {
    point: [f64; 2],
    index: usize,
}

impl RTreeObject for EndpointEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for EndpointEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Collapses segment endpoints within `tolerance` (coordinate units)
/// into nodes.
///
/// Endpoints are arena-indexed (`2 * segment`, `2 * segment + 1`) and
/// unioned through a disjoint-set structure, so the merge relation is
/// transitive: a chain A-B-C merges into one node even when A and C are
/// farther apart than the tolerance.
fn merge_endpoints(kept: &[(&Segment, f64)], tolerance: f64) -> Vec<EndpointGroup> {
    let endpoints: Vec<[f64; 2]> = kept
        .iter()
        .flat_map(|(segment, _)| {
            let first = segment.geometry.0[0];
            let last = segment.geometry.0[segment.geometry.0.len() - 1];
            [[first.x, first.y], [last.x, last.y]]
        })
        .collect();

    let tree = RTree::bulk_load(
        endpoints
            .iter()
            .enumerate()
            .map(|(index, &point)| EndpointEntry { point, index })
            .collect(),
    );

    let mut union_find = UnionFind::<usize>::new(endpoints.len());
    for (index, point) in endpoints.iter().enumerate() {
        for entry in tree.locate_within_distance(*point, tolerance * tolerance) {
            if entry.index != index {
                union_find.union(index, entry.index);
            }
        }
    }

    // Accumulate centroids per disjoint-set root, then assign each root a
    // stable group id in first-seen endpoint order so node numbering is
    // independent of hashing.
    let mut sums: HashMap<usize, (f64, f64, usize)> = HashMap::new();
    for (index, point) in endpoints.iter().enumerate() {
        let root = union_find.find(index);
        let entry = sums.entry(root).or_insert((0.0, 0.0, 0));
        entry.0 += point[0];
        entry.1 += point[1];
        entry.2 += 1;
    }

    let mut group_ids: HashMap<usize, usize> = HashMap::new();
    endpoints
        .iter()
        .enumerate()
        .map(|(index, _)| {
            let root = union_find.find(index);
            let next_id = group_ids.len();
            let id = *group_ids.entry(root).or_insert(next_id);
            let (sum_x, sum_y, count) = sums[&root];
            EndpointGroup {
                id,
                centroid: Point::new(sum_x / count as f64, sum_y / count as f64),
            }
        })
        .collect()
}
