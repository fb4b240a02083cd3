use crate::model::Segment;

/// Edge weight strategy: a function of segment and coverage.
///
/// The default policy below matches the reference system, but weighting
/// is in the eye of the beholder - callers can supply their own policy
/// via [`build_route_graph_with_policy`](super::build_route_graph_with_policy).
pub trait WeightPolicy: Send + Sync {
    fn edge_weight(&self, segment: &Segment, coverage: f64) -> f64;
}

/// Reference weight formula:
///
/// `length / max(point_count - 1, 1) + (1 - coverage) * penalty_scale`
///
/// Normalizing length by vertex count yields an average inter-sample
/// distance, so weights stay comparable across segments digitized at
/// different densities. The penalty term is additive: a fully covered
/// segment never costs less than its length-density floor.
#[derive(Debug, Clone)]
pub struct LengthDensityPolicy {
    pub penalty_scale: f64,
}

impl WeightPolicy for LengthDensityPolicy {
    fn edge_weight(&self, segment: &Segment, coverage: f64) -> f64 {
        let length = segment.length_m().unwrap_or(0.0);
        let hops = segment.point_count().saturating_sub(1).max(1) as f64;
        length / hops + (1.0 - coverage) * self.penalty_scale
    }
}

#[cfg(test)]
mod tests {
    use geo::line_string;

    use super::*;

    fn hundred_meter_segment() -> Segment {
        // ~100 m along the equator, two vertices
        Segment::new(1, line_string![(x: 0.0, y: 0.0), (x: 0.000898315, y: 0.0)])
    }

    #[test]
    fn full_coverage_leaves_pure_length_term() {
        let policy = LengthDensityPolicy {
            penalty_scale: 20.0,
        };
        let segment = hundred_meter_segment();
        let length = segment.length_m().unwrap();
        let weight = policy.edge_weight(&segment, 1.0);
        assert!((weight - length).abs() < 1e-9);
    }

    #[test]
    fn zero_coverage_adds_full_penalty() {
        let policy = LengthDensityPolicy {
            penalty_scale: 20.0,
        };
        let segment = hundred_meter_segment();
        let length = segment.length_m().unwrap();
        let weight = policy.edge_weight(&segment, 0.0);
        assert!((weight - (length + 20.0)).abs() < 1e-9);
    }

    #[test]
    fn length_is_normalized_by_hop_count() {
        let policy = LengthDensityPolicy { penalty_scale: 0.0 };
        // Same span, one intermediate vertex -> two hops
        let dense = Segment::new(
            2,
            line_string![(x: 0.0, y: 0.0), (x: 0.000449157, y: 0.0), (x: 0.000898315, y: 0.0)],
        );
        let sparse = hundred_meter_segment();
        let dense_weight = policy.edge_weight(&dense, 1.0);
        let sparse_weight = policy.edge_weight(&sparse, 1.0);
        assert!((dense_weight * 2.0 - sparse_weight).abs() < 1e-6);
    }
}
