//! Integration tests for the full routing engine.

use delivery_routing::config::Config;
use delivery_routing::error::EngineError;
use delivery_routing::feasibility::ExclusionReason;
use delivery_routing::metrics::MissReason;
use delivery_routing::problem::{Constraints, Stop, TravelMatrix};
use delivery_routing::{OptimizationRequest, RoutingEngine};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Depot D, A and B; D->A 10 min/5 km, A->B 5 min/2 km, B->D 10 min/5 km, D->B 12 min/6 km.
fn create_two_stop_matrix() -> TravelMatrix {
    TravelMatrix::new(vec![
        vec![(0u64, 0u64), (600, 5_000), (720, 6_000)],
        vec![(600, 5_000), (0, 0), (300, 2_000)],
        vec![(600, 5_000), (300, 2_000), (0, 0)],
    ])
    .unwrap()
}

fn create_two_stop_request(max_stops: usize, vehicles: usize) -> OptimizationRequest {
    OptimizationRequest::from_addresses(
        "Depot",
        &["A", "B"],
        create_two_stop_matrix(),
        Constraints::new(50_000, 7_200, max_stops).unwrap(),
        vehicles,
    )
}

fn create_test_engine() -> RoutingEngine {
    RoutingEngine::new(
        Config::new()
            .with_time_limit(Duration::from_secs(5))
            .with_max_iterations_without_improvement(20),
    )
}

#[test]
fn test_single_vehicle_serves_everything() {
    let mut engine = create_test_engine();
    let report = engine.optimize(&create_two_stop_request(5, 1)).unwrap();

    assert_eq!(report.routes.len(), 1);
    assert_eq!(report.routes[0].nodes, vec![0, 1, 2, 0]);
    assert_eq!(report.routes[0].addresses, vec!["Depot", "A", "B", "Depot"]);
    assert_eq!(report.total_time_seconds, 1_500);
    assert_eq!(report.total_distance_meters, 12_000);
    assert_eq!(report.served_count, 2);
    assert!(report.missed.is_empty());
}

#[test]
fn test_extra_vehicle_is_not_used_when_slower() {
    let mut engine = create_test_engine();
    let report = engine.optimize(&create_two_stop_request(5, 2)).unwrap();

    assert_eq!(report.num_vehicles_used, 1);
    assert_eq!(report.total_time_seconds, 1_500);
}

#[test]
fn test_stop_cap_spreads_stops_over_vehicles() {
    let mut engine = create_test_engine();
    let report = engine.optimize(&create_two_stop_request(1, 2)).unwrap();

    assert_eq!(report.num_vehicles_used, 2);
    assert_eq!(report.routes.len(), 2);
    assert!(report.routes.iter().all(|route| route.stop_count == 1));
    assert_eq!(report.served_count, 2);
    assert!(report.missed.is_empty());
}

#[test]
fn test_stop_cap_with_one_vehicle_drops_a_stop() {
    let mut engine = create_test_engine();
    let report = engine.optimize(&create_two_stop_request(1, 1)).unwrap();

    assert_eq!(report.routes.len(), 1);
    assert_eq!(report.routes[0].nodes, vec![0, 1, 0]);
    assert_eq!(report.dropped_nodes, vec![2]);
    assert_eq!(report.missed.len(), 1);
    assert_eq!(report.missed[0].address, "B");
    assert_eq!(report.missed[0].reason, MissReason::NotRouted);
}

#[test]
fn test_unreachable_stop_is_reported_not_routed() {
    // C can be reached in 50 minutes but the round trip takes 100.
    let matrix = TravelMatrix::new(vec![
        vec![(0u64, 0u64), (600, 5_000), (3_000, 20_000)],
        vec![(600, 5_000), (0, 0), (3_000, 20_000)],
        vec![(3_000, 20_000), (3_000, 20_000), (0, 0)],
    ])
    .unwrap();
    let request = OptimizationRequest::from_addresses(
        "Depot",
        &["A", "C"],
        matrix,
        Constraints::new(50_000, 5_000, 5).unwrap(),
        2,
    );

    let report = create_test_engine().optimize(&request).unwrap();

    assert_eq!(report.served_count, 1);
    assert_eq!(report.routes[0].addresses, vec!["Depot", "A", "Depot"]);
    assert_eq!(report.missed.len(), 1);
    assert_eq!(report.missed[0].address, "C");
    assert_eq!(
        report.missed[0].reason,
        MissReason::Excluded {
            cause: ExclusionReason::ExceedsTime {
                duration_seconds: 6_000
            }
        }
    );
}

#[test]
fn test_duplicate_addresses_are_partially_served() {
    let request = OptimizationRequest::from_addresses(
        "Depot",
        &["A", "B", "A"],
        create_two_stop_matrix(),
        Constraints::new(50_000, 7_200, 5).unwrap(),
        1,
    );

    let report = create_test_engine().optimize(&request).unwrap();

    assert_eq!(report.delivery_counts.total_required, 3);
    assert_eq!(report.delivery_counts.total_served, 2);
    assert_eq!(report.missed.len(), 1);
    assert_eq!(report.missed[0].address, "A");
    assert_eq!(
        report.missed[0].reason,
        MissReason::PartiallyServed {
            served: 1,
            required: 2
        }
    );
}

#[test]
fn test_input_errors() {
    let mut engine = create_test_engine();

    let no_vehicles = engine.optimize(&create_two_stop_request(5, 0)).unwrap_err();
    assert_eq!(no_vehicles, EngineError::NoVehicles);
    assert!(no_vehicles.is_input_error());

    let empty = OptimizationRequest {
        stops: Vec::new(),
        ..create_two_stop_request(5, 1)
    };
    assert_eq!(engine.optimize(&empty).unwrap_err(), EngineError::EmptyStopList);

    let short_matrix = OptimizationRequest {
        stops: vec![Stop::new("A", 1, 1), Stop::new("B", 1, 2), Stop::new("C", 1, 3)],
        ..create_two_stop_request(5, 1)
    };
    assert_eq!(
        engine.optimize(&short_matrix).unwrap_err(),
        EngineError::MatrixDimension {
            expected: 4,
            actual: 3
        }
    );
}

#[test]
fn test_all_stops_excluded() {
    let request = OptimizationRequest::from_addresses(
        "Depot",
        &["A", "B"],
        create_two_stop_matrix(),
        Constraints::new(50_000, 1_000, 5).unwrap(),
        2,
    );

    match create_test_engine().optimize(&request) {
        Err(EngineError::NoValidStops { excluded }) => {
            assert_eq!(excluded.len(), 2);
            assert!(excluded
                .iter()
                .all(|e| matches!(e.reason, ExclusionReason::ExceedsTime { .. })));
        }
        other => panic!("expected NoValidStops, got {:?}", other),
    }
}

#[test]
fn test_repeated_runs_agree() {
    let mut engine = create_test_engine();
    let request = create_two_stop_request(5, 2);

    let first = engine.optimize(&request).unwrap();
    let second = engine.optimize(&request).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_random_requests_keep_invariants() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut engine = RoutingEngine::new(
        Config::new()
            .with_time_limit(Duration::from_millis(200))
            .with_max_iterations_without_improvement(10),
    );

    for _ in 0..15 {
        let stop_count = rng.gen_range(1..12);
        let size = stop_count + 1;
        let rows = (0..size)
            .map(|i| {
                (0..size)
                    .map(|j| {
                        if i == j {
                            (0u64, 0u64)
                        } else {
                            (rng.gen_range(120..3_000), rng.gen_range(1_000..40_000))
                        }
                    })
                    .collect()
            })
            .collect();
        let matrix = TravelMatrix::new::<(u64, u64)>(rows).unwrap();
        let constraints = Constraints::new(
            rng.gen_range(30_000..150_000),
            rng.gen_range(3_600..14_400),
            rng.gen_range(1..6),
        )
        .unwrap();
        let addresses: Vec<String> = (1..=stop_count).map(|i| format!("{} Main St", i)).collect();
        let request = OptimizationRequest::from_addresses(
            "Depot",
            &addresses,
            matrix,
            constraints,
            rng.gen_range(1..5),
        );

        let report = match engine.optimize(&request) {
            Ok(report) => report,
            Err(EngineError::NoValidStops { .. }) => continue,
            Err(error) => panic!("unexpected error: {}", error),
        };

        assert!(report.routes.len() <= request.available_vehicles);
        assert!(report.num_vehicles_used <= request.available_vehicles);
        for route in &report.routes {
            assert!(route.distance_meters <= constraints.max_distance_meters);
            assert!(route.duration_seconds <= constraints.max_duration_seconds);
            assert!(route.stop_count <= constraints.max_stops_per_vehicle);
            assert_eq!(route.nodes.first(), Some(&0));
            assert_eq!(route.nodes.last(), Some(&0));
        }
        assert_eq!(
            report.routes.iter().map(|r| r.duration_seconds).sum::<u64>(),
            report.total_time_seconds
        );
        // Every unique stop is served, dropped or listed as missed.
        assert_eq!(report.served_count + report.missed.len(), stop_count);
        assert_eq!(report.delivery_counts.total_served, report.served_count);
    }
}

#[test]
fn test_shared_matrix_index_is_rejected() {
    let request = OptimizationRequest {
        stops: vec![Stop::new("A", 1, 1), Stop::new("B", 1, 1)],
        ..create_two_stop_request(5, 1)
    };

    let error = create_test_engine().optimize(&request).unwrap_err();

    assert_eq!(error, EngineError::DuplicateMatrixIndex { index: 1 });
    assert!(error.is_input_error());
}

#[test]
fn test_zero_limit_is_an_input_error() {
    let request = OptimizationRequest {
        constraints: Constraints {
            max_distance_meters: 50_000,
            max_duration_seconds: 7_200,
            max_stops_per_vehicle: 0,
        },
        ..create_two_stop_request(5, 1)
    };

    let error = create_test_engine().optimize(&request).unwrap_err();

    assert_eq!(
        error,
        EngineError::InvalidConstraint {
            name: "max_stops_per_vehicle"
        }
    );
    assert!(error.is_input_error());
}

#[test]
fn test_request_with_zero_limit_fails_to_deserialize() {
    let mut json = serde_json::to_value(create_two_stop_request(5, 1)).unwrap();
    json["constraints"]["max_stops_per_vehicle"] = serde_json::json!(0);

    let error = serde_json::from_value::<OptimizationRequest>(json).unwrap_err();

    assert!(error.to_string().contains("max_stops_per_vehicle"));
}

#[test]
fn test_huge_legs_split_stops_across_vehicles() {
    // A and B are each close to the depot but effectively unreachable from one another.
    let matrix = TravelMatrix::new(vec![
        vec![(0u64, 0u64), (600, 5_000), (600, 5_000)],
        vec![(600, 5_000), (0, 0), (u64::MAX, u64::MAX)],
        vec![(600, 5_000), (u64::MAX, u64::MAX), (0, 0)],
    ])
    .unwrap();
    let request = OptimizationRequest::from_addresses(
        "Depot",
        &["A", "B"],
        matrix,
        Constraints::new(50_000, 7_200, 5).unwrap(),
        2,
    );

    let report = create_test_engine().optimize(&request).unwrap();

    assert_eq!(report.num_vehicles_used, 2);
    assert_eq!(report.served_count, 2);
    assert!(report.routes.iter().all(|route| route.stop_count == 1));
}
