use thiserror::Error;

use crate::SegmentId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("segment {segment_id} has {points} vertices, at least 2 required")]
    InvalidGeometry { segment_id: SegmentId, points: usize },
    #[error("no graph node within {max_radius_m} m of query point (nearest is {distance_m:.1} m away)")]
    NoNodeInRange { distance_m: f64, max_radius_m: f64 },
    #[error("origin and destination are not connected")]
    NoPath,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
