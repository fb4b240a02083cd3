//! Compilation of raw segments and samples into a weighted route graph.
//!
//! Attribution assigns each segment a `[0, 1]` coverage value from the
//! sample buffers, then the builder merges segment endpoints into nodes
//! and emits one directed edge per traversal direction.

pub mod attribution;
mod builder;
mod config;
mod weight;

pub use builder::{build_route_graph, build_route_graph_with_policy};
pub use config::GraphConfig;
pub use weight::{LengthDensityPolicy, WeightPolicy};
