//! Shared engine: one active graph, atomically replaced on rebuild.

use std::sync::{Arc, RwLock};

use geo::Point;
use log::info;

use crate::building::{GraphConfig, build_route_graph};
use crate::error::Error;
use crate::model::{BeautySample, RouteGraph, Segment};
use crate::routing::{RoutePath, SolveOptions, solve};

/// Holds the active [`RouteGraph`] behind an atomically swappable
/// reference.
///
/// Solves clone the `Arc` and run lock-free against an immutable graph;
/// a rebuild constructs the complete replacement first and only then
/// swaps it in, so readers holding the old graph finish safely and a
/// failed rebuild leaves the previous graph active.
pub struct RoutingEngine {
    active: RwLock<Arc<RouteGraph>>,
}

impl RoutingEngine {
    pub fn new(graph: RouteGraph) -> Self {
        Self {
            active: RwLock::new(Arc::new(graph)),
        }
    }

    /// Builds the initial graph and wraps it in an engine.
    ///
    /// # Errors
    ///
    /// Propagates build failures; no engine is created in that case.
    pub fn create(
        segments: &[Segment],
        samples: &[BeautySample],
        config: &GraphConfig,
    ) -> Result<Self, Error> {
        Ok(Self::new(build_route_graph(segments, samples, config)?))
    }

    /// Snapshot of the currently active graph.
    pub fn graph(&self) -> Arc<RouteGraph> {
        Arc::clone(&self.active.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Rebuilds the graph from scratch and swaps it in.
    ///
    /// # Errors
    ///
    /// Propagates build failures; the previous graph stays active.
    pub fn rebuild(
        &self,
        segments: &[Segment],
        samples: &[BeautySample],
        config: &GraphConfig,
    ) -> Result<(), Error> {
        // Build outside the lock; the swap itself is a pointer store
        let replacement = Arc::new(build_route_graph(segments, samples, config)?);
        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        *active = replacement;
        info!("route graph replaced");
        Ok(())
    }

    /// Solves against the currently active graph.
    ///
    /// # Errors
    ///
    /// See [`solve`].
    pub fn solve(
        &self,
        origin: Point<f64>,
        destination: Point<f64>,
        options: &SolveOptions,
    ) -> Result<RoutePath, Error> {
        let graph = self.graph();
        solve(&graph, origin, destination, options)
    }
}

#[cfg(test)]
mod tests {
    use geo::line_string;

    use super::*;

    #[test]
    fn failed_rebuild_keeps_previous_graph() {
        let segments = vec![Segment::new(
            1,
            line_string![(x: 0.0, y: 0.0), (x: 0.001, y: 0.0)],
        )];
        let engine = RoutingEngine::create(&segments, &[], &GraphConfig::default()).unwrap();
        assert_eq!(engine.graph().edge_count(), 2);

        let bad_config = GraphConfig {
            penalty_scale: -5.0,
            ..GraphConfig::default()
        };
        assert!(engine.rebuild(&[], &[], &bad_config).is_err());
        // Old graph still answers
        assert_eq!(engine.graph().edge_count(), 2);
    }

    #[test]
    fn rebuild_swaps_while_old_reference_stays_valid() {
        let segments = vec![Segment::new(
            1,
            line_string![(x: 0.0, y: 0.0), (x: 0.001, y: 0.0)],
        )];
        let engine = RoutingEngine::create(&segments, &[], &GraphConfig::default()).unwrap();

        let held = engine.graph();
        let more = vec![
            segments[0].clone(),
            Segment::new(2, line_string![(x: 0.001, y: 0.0), (x: 0.002, y: 0.0)]),
        ];
        engine.rebuild(&more, &[], &GraphConfig::default()).unwrap();

        assert_eq!(held.edge_count(), 2);
        assert_eq!(engine.graph().edge_count(), 4);
    }
}
