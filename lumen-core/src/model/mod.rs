//! Data model for scenic-weighted routing
//!
//! Contains the immutable geometry inputs (segments and samples) and the
//! built route graph they are compiled into.

pub mod graph;
pub mod segment;
pub mod snapshot;

pub use graph::{Direction, RouteEdge, RouteGraph, RouteNode};
pub use segment::{BeautySample, Segment};
pub use snapshot::GraphSnapshot;
