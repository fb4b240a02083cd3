//! Spatial attribution: per-segment attribute coverage
//!
//! Each sample is buffered into a disc of `buffer_radius_m`; a segment's
//! coverage is the fraction of its polyline vertices lying inside the
//! union of those discs. Membership in the union is a per-vertex boolean,
//! so overlapping buffers never double-count, and a segment whose every
//! vertex sits inside one buffer has coverage 1. A vertex counts as
//! covered only when its nearest in-range sample scores at least
//! `min_score`.

use geo::{Distance, Haversine, Point};
use rayon::prelude::*;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use super::config::GraphConfig;
use crate::geomath::search_radius_deg;
use crate::model::{BeautySample, Segment};

#[derive(Debug, Clone)]
struct SampleEntry {
    point: [f64; 2],
    score: f64,
}

impl RTreeObject for SampleEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for SampleEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Computes coverage for every segment, in input order.
///
/// Coverage is total: segments with no sample in range get `0.0`, never a
/// missing value - downstream weighting depends on this. Segments with a
/// degenerate polyline also get `0.0`; the builder skips them separately.
pub fn segment_coverage(
    segments: &[Segment],
    samples: &[BeautySample],
    config: &GraphConfig,
) -> Vec<f64> {
    let index = RTree::bulk_load(
        samples
            .iter()
            .map(|sample| SampleEntry {
                point: [sample.geometry.x(), sample.geometry.y()],
                score: sample.score,
            })
            .collect(),
    );

    segments
        .par_iter()
        .map(|segment| coverage_for_segment(segment, &index, config))
        .collect()
}

fn coverage_for_segment(segment: &Segment, index: &RTree<SampleEntry>, config: &GraphConfig) -> f64 {
    let total = segment.point_count();
    if total == 0 || config.buffer_radius_m <= 0.0 {
        return 0.0;
    }

    let covered = segment
        .geometry
        .points()
        .filter(|vertex| vertex_is_covered(vertex, index, config))
        .count();

    covered as f64 / total as f64
}

fn vertex_is_covered(vertex: &Point<f64>, index: &RTree<SampleEntry>, config: &GraphConfig) -> bool {
    // Degree-space pre-filter, then exact haversine confirmation
    let radius_m = config.buffer_radius_m;
    let search_deg = search_radius_deg(radius_m, vertex.y());

    index
        .locate_within_distance([vertex.x(), vertex.y()], search_deg * search_deg)
        .filter_map(|entry| {
            let sample_point = Point::new(entry.point[0], entry.point[1]);
            let distance_m = Haversine.distance(*vertex, sample_point);
            (distance_m <= radius_m).then_some((distance_m, entry.score))
        })
        // The nearest in-range sample decides; a low-scoring sample
        // close by is not overridden by a high-scoring one farther out
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .is_some_and(|(_, score)| score >= config.min_score)
}
