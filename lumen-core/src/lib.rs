//! Scenic-weighted shortest-path routing over road networks.
//!
//! The crate fuses raw road geometry with point-sampled attribute scores
//! (street lighting in the reference scenario) into a single weighted
//! graph, then answers point-to-point route queries against it:
//!
//! 1. Road segments are attributed with a `[0, 1]` coverage value by
//!    buffering the sample points and testing segment vertices against
//!    the union of the resulting discs.
//! 2. Segment endpoints are merged into graph nodes within a coordinate
//!    tolerance and each segment becomes a weighted edge.
//! 3. Queries snap arbitrary coordinates onto the nearest graph node and
//!    run a shortest-path search, optionally with turn penalties.
//!
//! The graph is immutable once built; rebuilding produces a new value
//! that [`RoutingEngine`] swaps in atomically while in-flight queries
//! finish against the old one.

pub mod building;
pub mod engine;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

mod geomath;

pub use crate::building::{
    GraphConfig, LengthDensityPolicy, WeightPolicy, build_route_graph, build_route_graph_with_policy,
};
pub use crate::engine::RoutingEngine;
pub use crate::error::Error;
pub use crate::model::{BeautySample, Direction, GraphSnapshot, RouteGraph, Segment};
pub use crate::routing::{PathLeg, RoutePath, SolveOptions, TurnPenalties, solve};

/// Identifier of a road segment, assigned by the data source.
pub type SegmentId = u64;

/// Illumination footprint radius of a single sample, in meters.
///
/// Derived from the average real-world fixture height; a tunable
/// constant, not a physical law.
pub const DEFAULT_BUFFER_RADIUS_M: f64 = 9.0;

/// Distance-equivalent penalty for a fully uncovered segment.
pub const DEFAULT_PENALTY_SCALE: f64 = 20.0;

/// Endpoint merge tolerance in coordinate units (~1 m at mid-latitudes).
pub const DEFAULT_MERGE_TOLERANCE: f64 = 1e-5;

/// Floor applied to edge weights so degenerate segments never produce
/// zero or negative costs.
pub const MIN_EDGE_WEIGHT: f64 = 1e-9;
