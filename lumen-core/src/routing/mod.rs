//! Point-to-point route queries against a built graph.
//!
//! A query snaps both coordinates onto graph nodes, runs a binary-heap
//! Dijkstra (plain node search, or edge-state search when turn penalties
//! are enabled) and reconstructs the path geometry from the traversed
//! edges.

mod dijkstra;
mod path;
mod turn_aware;

pub use path::{PathLeg, RoutePath};

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::geomath::normalize_bearing_delta;
use crate::model::RouteGraph;

/// Additional cost applied when a path transitions between two edges,
/// keyed by the turn angle class. All zero by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnPenalties {
    pub left: f64,
    pub right: f64,
    pub sharp: f64,
    pub straight: f64,
}

impl TurnPenalties {
    /// Penalty for a bearing change of `delta_deg` degrees (positive =
    /// clockwise). Below 30 degrees counts as straight, beyond 150 as a
    /// sharp turn.
    pub(crate) fn for_bearing_delta(&self, delta_deg: f64) -> f64 {
        let delta = normalize_bearing_delta(delta_deg);
        match delta.abs() {
            a if a < 30.0 => self.straight,
            a if a >= 150.0 => self.sharp,
            _ if delta > 0.0 => self.right,
            _ => self.left,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("left", self.left),
            ("right", self.right),
            ("sharp", self.sharp),
            ("straight", self.straight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "turn penalty '{name}' must be a non-negative finite number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Per-query options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Maximum snap distance in meters; `0` means unbounded.
    pub max_solution_radius: f64,
    /// Enables the edge-state search when set.
    pub turn_penalties: Option<TurnPenalties>,
}

impl SolveOptions {
    fn validate(&self) -> Result<(), Error> {
        if !self.max_solution_radius.is_finite() || self.max_solution_radius < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_solution_radius must be a non-negative finite number, got {}",
                self.max_solution_radius
            )));
        }
        if let Some(penalties) = &self.turn_penalties {
            penalties.validate()?;
        }
        Ok(())
    }
}

/// Finds the minimum-weight path between two geographic coordinates.
///
/// Both coordinates are snapped to their nearest graph node within
/// `max_solution_radius`. Snapping both onto the same node yields a
/// zero-weight single-node path.
///
/// # Errors
///
/// - [`Error::InvalidConfig`] for contradictory options.
/// - [`Error::NoNodeInRange`] when a coordinate cannot be snapped.
/// - [`Error::NoPath`] when the snapped nodes are not connected.
pub fn solve(
    graph: &RouteGraph,
    origin: Point<f64>,
    destination: Point<f64>,
    options: &SolveOptions,
) -> Result<RoutePath, Error> {
    options.validate()?;

    let source = graph.snap(&origin, options.max_solution_radius)?;
    let target = graph.snap(&destination, options.max_solution_radius)?;

    if source == target {
        return Ok(RoutePath::single_node(graph.node_point(source)));
    }

    let (edges, total_weight) = match &options.turn_penalties {
        Some(penalties) => turn_aware::shortest_edge_path(graph, source, target, penalties)?,
        None => dijkstra::shortest_edge_path(graph, source, target)?,
    };

    Ok(RoutePath::from_edges(graph, &edges, total_weight))
}
