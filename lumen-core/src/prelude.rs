// Re-export key components
pub use crate::building::{
    GraphConfig, LengthDensityPolicy, WeightPolicy, build_route_graph, build_route_graph_with_policy,
};
pub use crate::engine::RoutingEngine;
pub use crate::error::Error;
pub use crate::loading::{load_samples_csv, load_segments_geojson};
pub use crate::model::{BeautySample, Direction, GraphSnapshot, RouteGraph, Segment};
pub use crate::routing::{PathLeg, RoutePath, SolveOptions, TurnPenalties, solve};

pub use crate::SegmentId;
