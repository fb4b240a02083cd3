//! End-to-end route queries over small synthetic networks.
//!
//! Coordinates are degrees at the equator where 0.001 deg of longitude
//! is ~111.3 m.

use geo::Point;
use lumen_core::prelude::*;

fn segment(id: u64, coords: &[(f64, f64)]) -> Segment {
    Segment::new(
        id,
        coords.iter().map(|&(x, y)| geo::coord! { x: x, y: y }).collect(),
    )
}

fn unbounded() -> SolveOptions {
    SolveOptions::default()
}

#[test]
fn prefers_the_covered_segment_between_the_same_nodes() {
    // Two three-vertex alternatives between A and B. The lit one runs
    // straight with a sample at every vertex (coverage 1); the dark
    // detour bulges ~44 m north of the lit midpoint, out of sample
    // range. The lit segment must win on weight.
    let lit = segment(1, &[(0.0, 0.0), (0.0005, 0.0), (0.001, 0.0)]);
    let dark = segment(2, &[(0.0, 0.0), (0.0005, 0.0004), (0.001, 0.0)]);
    let samples = vec![
        BeautySample::new(0.0, 0.0, 1.0),
        BeautySample::new(0.0005, 0.0, 1.0),
        BeautySample::new(0.001, 0.0, 1.0),
    ];

    let graph = build_route_graph(&[lit, dark], &samples, &GraphConfig::default()).unwrap();
    let path = solve(
        &graph,
        Point::new(0.0, 0.0),
        Point::new(0.001, 0.0),
        &unbounded(),
    )
    .unwrap();

    assert_eq!(path.legs.len(), 1);
    assert_eq!(path.legs[0].segment_id, 1);
    // Pure length-density term, no penalty: ~111.3 m over two hops
    assert!(
        (path.total_weight - 55.66).abs() < 0.5,
        "weight {}",
        path.total_weight
    );
}

#[test]
fn identical_source_and_destination_is_a_zero_weight_path() {
    let graph = build_route_graph(
        &[segment(1, &[(0.0, 0.0), (0.001, 0.0)])],
        &[],
        &GraphConfig::default(),
    )
    .unwrap();

    let path = solve(
        &graph,
        Point::new(0.0, 0.0),
        Point::new(0.0, 0.0),
        &unbounded(),
    )
    .unwrap();

    assert_eq!(path.total_weight, 0.0);
    assert!(path.legs.is_empty());
    assert_eq!(path.geometry.0.len(), 1);
}

#[test]
fn disconnected_components_report_no_path() {
    let segments = vec![
        segment(1, &[(0.0, 0.0), (0.001, 0.0)]),
        // A second component ~11 km away
        segment(2, &[(0.1, 0.0), (0.101, 0.0)]),
    ];
    let graph = build_route_graph(&segments, &[], &GraphConfig::default()).unwrap();

    let result = solve(
        &graph,
        Point::new(0.0, 0.0),
        Point::new(0.101, 0.0),
        &unbounded(),
    );
    assert!(matches!(result, Err(Error::NoPath)));
}

#[test]
fn snap_radius_bounds_the_node_search() {
    let graph = build_route_graph(
        &[segment(1, &[(0.0, 0.0), (0.001, 0.0)])],
        &[],
        &GraphConfig::default(),
    )
    .unwrap();

    // ~2 m south of the first node
    let origin = Point::new(0.0, -0.000018);
    let destination = Point::new(0.001, 0.0);

    let strict = SolveOptions {
        max_solution_radius: 1.0,
        ..SolveOptions::default()
    };
    assert!(matches!(
        solve(&graph, origin, destination, &strict),
        Err(Error::NoNodeInRange { .. })
    ));

    let relaxed = SolveOptions {
        max_solution_radius: 5.0,
        ..SolveOptions::default()
    };
    let path = solve(&graph, origin, destination, &relaxed).unwrap();
    assert_eq!(path.legs.len(), 1);
}

#[test]
fn multi_hop_route_concatenates_geometry_in_order() {
    let segments = vec![
        segment(1, &[(0.0, 0.0), (0.001, 0.0)]),
        segment(2, &[(0.001, 0.0), (0.002, 0.0)]),
        segment(3, &[(0.002, 0.0), (0.003, 0.0)]),
    ];
    let graph = build_route_graph(&segments, &[], &GraphConfig::default()).unwrap();

    let path = solve(
        &graph,
        Point::new(0.0, 0.0),
        Point::new(0.003, 0.0),
        &unbounded(),
    )
    .unwrap();

    assert_eq!(
        path.legs.iter().map(|leg| leg.segment_id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert!(
        path.legs
            .iter()
            .all(|leg| leg.direction == Direction::Forward)
    );
    // Four distinct vertices after joint deduplication
    assert_eq!(path.geometry.0.len(), 4);
    let xs: Vec<f64> = path.geometry.0.iter().map(|c| c.x).collect();
    assert_eq!(xs, vec![0.0, 0.001, 0.002, 0.003]);
}

#[test]
fn backward_traversal_reverses_segment_geometry() {
    let graph = build_route_graph(
        &[segment(1, &[(0.0, 0.0), (0.001, 0.0)])],
        &[],
        &GraphConfig::default(),
    )
    .unwrap();

    let path = solve(
        &graph,
        Point::new(0.001, 0.0),
        Point::new(0.0, 0.0),
        &unbounded(),
    )
    .unwrap();

    assert_eq!(path.legs[0].direction, Direction::Backward);
    let xs: Vec<f64> = path.geometry.0.iter().map(|c| c.x).collect();
    assert_eq!(xs, vec![0.001, 0.0]);
}

#[test]
fn oneway_segment_is_impassable_in_reverse_when_directed() {
    let mut one = segment(1, &[(0.0, 0.0), (0.001, 0.0)]);
    one.oneway = true;
    let config = GraphConfig {
        directed: true,
        ..GraphConfig::default()
    };
    let graph = build_route_graph(&[one], &[], &config).unwrap();

    assert!(
        solve(
            &graph,
            Point::new(0.0, 0.0),
            Point::new(0.001, 0.0),
            &unbounded()
        )
        .is_ok()
    );
    assert!(matches!(
        solve(
            &graph,
            Point::new(0.001, 0.0),
            Point::new(0.0, 0.0),
            &unbounded()
        ),
        Err(Error::NoPath)
    ));
}

#[test]
fn turn_penalties_steer_between_equal_length_routes() {
    // Square grid: two equal-cost routes from A to the opposite corner,
    // one turning left at the junction, the other turning right.
    let segments = vec![
        segment(1, &[(0.0, 0.0), (0.001, 0.0)]),     // A -> B, east
        segment(2, &[(0.001, 0.0), (0.001, 0.001)]), // B -> C, north (left turn)
        segment(3, &[(0.0, 0.0), (0.0, 0.001)]),     // A -> D, north
        segment(4, &[(0.0, 0.001), (0.001, 0.001)]), // D -> C, east (right turn)
    ];
    let graph = build_route_graph(&segments, &[], &GraphConfig::default()).unwrap();

    let penalize_right = SolveOptions {
        turn_penalties: Some(TurnPenalties {
            right: 10.0,
            ..TurnPenalties::default()
        }),
        ..SolveOptions::default()
    };
    let path = solve(
        &graph,
        Point::new(0.0, 0.0),
        Point::new(0.001, 0.001),
        &penalize_right,
    )
    .unwrap();
    assert_eq!(path.legs[0].segment_id, 1, "expected the left-turning route");

    let penalize_left = SolveOptions {
        turn_penalties: Some(TurnPenalties {
            left: 10.0,
            ..TurnPenalties::default()
        }),
        ..SolveOptions::default()
    };
    let path = solve(
        &graph,
        Point::new(0.0, 0.0),
        Point::new(0.001, 0.001),
        &penalize_left,
    )
    .unwrap();
    assert_eq!(path.legs[0].segment_id, 3, "expected the right-turning route");
}

#[test]
fn turn_penalties_add_to_the_total_weight() {
    let segments = vec![
        segment(1, &[(0.0, 0.0), (0.001, 0.0)]),
        segment(2, &[(0.001, 0.0), (0.001, 0.001)]),
    ];
    let graph = build_route_graph(&segments, &[], &GraphConfig::default()).unwrap();
    let origin = Point::new(0.0, 0.0);
    let destination = Point::new(0.001, 0.001);

    let plain = solve(&graph, origin, destination, &unbounded()).unwrap();
    let with_penalty = SolveOptions {
        turn_penalties: Some(TurnPenalties {
            left: 7.5,
            ..TurnPenalties::default()
        }),
        ..SolveOptions::default()
    };
    let penalized = solve(&graph, origin, destination, &with_penalty).unwrap();

    assert!((penalized.total_weight - plain.total_weight - 7.5).abs() < 1e-9);
}

#[test]
fn parallel_equal_cost_edges_resolve_to_the_first_segment() {
    // Two identical segments between the same endpoints: both solvers
    // must deterministically pick the one compiled first.
    let segments = vec![
        segment(1, &[(0.0, 0.0), (0.001, 0.0)]),
        segment(2, &[(0.0, 0.0), (0.001, 0.0)]),
    ];
    let graph = build_route_graph(&segments, &[], &GraphConfig::default()).unwrap();
    let origin = Point::new(0.0, 0.0);
    let destination = Point::new(0.001, 0.0);

    let plain = solve(&graph, origin, destination, &unbounded()).unwrap();
    assert_eq!(plain.legs[0].segment_id, 1);

    let with_turns = SolveOptions {
        turn_penalties: Some(TurnPenalties::default()),
        ..SolveOptions::default()
    };
    let edge_state = solve(&graph, origin, destination, &with_turns).unwrap();
    assert_eq!(edge_state.legs[0].segment_id, 1);
}

#[test]
fn snapshot_round_trip_reproduces_solve_behavior() {
    let segments = vec![
        segment(1, &[(0.0, 0.0), (0.001, 0.0)]),
        segment(2, &[(0.001, 0.0), (0.001, 0.001)]),
        segment(3, &[(0.0, 0.0), (0.0005, 0.0008), (0.001, 0.001)]),
    ];
    let samples = vec![BeautySample::new(0.001, 0.0005, 1.0)];
    let graph = build_route_graph(&segments, &samples, &GraphConfig::default()).unwrap();

    let json = serde_json::to_string(&graph.to_snapshot()).unwrap();
    let snapshot: GraphSnapshot = serde_json::from_str(&json).unwrap();
    let restored = RouteGraph::from_snapshot(&snapshot).unwrap();

    let origin = Point::new(0.0, 0.0);
    let destination = Point::new(0.001, 0.001);
    let original = solve(&graph, origin, destination, &unbounded()).unwrap();
    let replayed = solve(&restored, origin, destination, &unbounded()).unwrap();

    assert_eq!(original.legs, replayed.legs);
    assert!((original.total_weight - replayed.total_weight).abs() < 1e-12);
}

#[test]
fn empty_graph_cannot_snap() {
    let graph = build_route_graph(&[], &[], &GraphConfig::default()).unwrap();
    let result = solve(
        &graph,
        Point::new(0.0, 0.0),
        Point::new(0.001, 0.0),
        &unbounded(),
    );
    assert!(matches!(result, Err(Error::NoNodeInRange { .. })));
}

#[test]
fn negative_solve_options_are_rejected() {
    let graph = build_route_graph(
        &[segment(1, &[(0.0, 0.0), (0.001, 0.0)])],
        &[],
        &GraphConfig::default(),
    )
    .unwrap();

    let options = SolveOptions {
        max_solution_radius: -1.0,
        ..SolveOptions::default()
    };
    assert!(matches!(
        solve(&graph, Point::new(0.0, 0.0), Point::new(0.001, 0.0), &options),
        Err(Error::InvalidConfig(_))
    ));
}
