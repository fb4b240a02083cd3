//! Road segments and attribute samples - the raw inputs of graph building

use geo::{Distance, Haversine, LineString, Point};
use itertools::Itertools;

use crate::{Error, SegmentId};

/// A single road polyline with attributes, the unit of graph edges.
///
/// Coordinates are `(lon, lat)` in degrees, matching the `geo` crate
/// convention of `x = lon`, `y = lat`.
#[derive(Debug, Clone)]
pub struct Segment {
    pub id: SegmentId,
    pub geometry: LineString<f64>,
    /// Forbids reverse traversal when the graph is built directed.
    pub oneway: bool,
    /// Road class tag from the data source, carried through untouched.
    pub class: Option<String>,
    pub max_speed: Option<f64>,
}

impl Segment {
    pub fn new(id: SegmentId, geometry: LineString<f64>) -> Self {
        Self {
            id,
            geometry,
            oneway: false,
            class: None,
            max_speed: None,
        }
    }

    /// Number of polyline vertices; used as the per-segment sampling
    /// density denominator in the weight formula.
    pub fn point_count(&self) -> usize {
        self.geometry.0.len()
    }

    /// Sum of pairwise haversine distances between consecutive vertices,
    /// in meters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if the polyline has fewer than
    /// two vertices.
    pub fn length_m(&self) -> Result<f64, Error> {
        self.validate()?;
        Ok(self
            .geometry
            .points()
            .tuple_windows()
            .map(|(a, b)| Haversine.distance(a, b))
            .sum())
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.point_count() < 2 {
            return Err(Error::InvalidGeometry {
                segment_id: self.id,
                points: self.point_count(),
            });
        }
        Ok(())
    }
}

/// A point-sampled attribute score (illumination/beauty in the reference
/// scenario). The score scale is caller-defined; the core enforces no
/// bounds.
#[derive(Debug, Clone, Copy)]
pub struct BeautySample {
    pub geometry: Point<f64>,
    pub score: f64,
}

impl BeautySample {
    pub fn new(lon: f64, lat: f64, score: f64) -> Self {
        Self {
            geometry: Point::new(lon, lat),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use geo::line_string;

    use super::*;

    #[test]
    fn length_sums_consecutive_distances() {
        // Two equal hops of 0.001 deg longitude along the equator
        let segment = Segment::new(
            1,
            line_string![(x: 0.0, y: 0.0), (x: 0.001, y: 0.0), (x: 0.002, y: 0.0)],
        );
        let length = segment.length_m().unwrap();
        // ~111.32 m per 0.001 deg at the equator
        assert!((length - 222.64).abs() < 1.0, "length was {length}");
        assert_eq!(segment.point_count(), 3);
    }

    #[test]
    fn degenerate_polyline_is_rejected() {
        let segment = Segment::new(7, line_string![(x: 10.0, y: 50.0)]);
        match segment.length_m() {
            Err(Error::InvalidGeometry { segment_id, points }) => {
                assert_eq!(segment_id, 7);
                assert_eq!(points, 1);
            }
            other => panic!("expected InvalidGeometry, got {other:?}"),
        }
    }
}
