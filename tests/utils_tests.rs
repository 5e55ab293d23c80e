//! Tests for unit helpers, configuration and input types.

use delivery_routing::config::{Config, RouteSettings};
use delivery_routing::error::EngineError;
use delivery_routing::problem::{Constraints, Travel, TravelMatrix};
use delivery_routing::utils::{
    format_duration, format_miles, meters_to_miles, percent_saved, seconds_to_hours,
};
use std::time::Duration;

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(3725), "1 hours, 2 minutes, 5 seconds");
    assert_eq!(format_duration(0), "0 hours, 0 minutes, 0 seconds");
    assert_eq!(format_duration(28_800), "8 hours, 0 minutes, 0 seconds");
}

#[test]
fn test_unit_conversions() {
    assert!((meters_to_miles(1_609) - 0.99979).abs() < 1e-4);
    assert!((seconds_to_hours(5_400) - 1.5).abs() < 1e-12);
    assert_eq!(format_miles(160_934), "100.00 miles");
}

#[test]
fn test_percent_saved() {
    assert!((percent_saved(200, 150) - 25.0).abs() < 1e-9);
    assert!((percent_saved(100, 120) + 20.0).abs() < 1e-9);
    assert_eq!(percent_saved(0, 50), 0.0);
}

#[test]
fn test_route_settings_defaults() {
    let settings = RouteSettings::default();
    let constraints = settings.to_constraints().unwrap();

    assert_eq!(constraints.max_distance_meters, 160_934);
    assert_eq!(constraints.max_duration_seconds, 28_800);
    assert_eq!(constraints.max_stops_per_vehicle, 20);
    assert_eq!(settings.drop_penalty, 1000);
}

#[test]
fn test_route_settings_truncate_fractional_units() {
    let settings = RouteSettings {
        max_miles: 0.5,
        max_time: 0.01,
        ..RouteSettings::default()
    };

    let constraints = settings.to_constraints().unwrap();

    assert_eq!(constraints.max_distance_meters, 804);
    assert_eq!(constraints.max_duration_seconds, 36);
}

#[test]
fn test_route_settings_reject_bad_limits() {
    let zero_miles = RouteSettings {
        max_miles: 0.0,
        ..RouteSettings::default()
    };
    assert_eq!(
        zero_miles.to_constraints().unwrap_err(),
        EngineError::InvalidConstraint { name: "max_miles" }
    );

    let endless = RouteSettings {
        max_time: f64::INFINITY,
        ..RouteSettings::default()
    };
    assert_eq!(
        endless.to_constraints().unwrap_err(),
        EngineError::InvalidConstraint { name: "max_time" }
    );

    let no_stops = RouteSettings {
        max_stops: 0,
        ..RouteSettings::default()
    };
    assert!(no_stops.to_constraints().is_err());
}

#[test]
fn test_route_settings_deserialize_with_defaults() {
    let settings: RouteSettings = serde_json::from_str(r#"{"max_stops": 12}"#).unwrap();

    assert_eq!(settings.max_stops, 12);
    assert_eq!(settings.max_miles, 100.0);
    assert_eq!(settings.max_time, 8.0);
}

#[test]
fn test_config_builder() {
    let config = Config::new()
        .with_time_limit(Duration::from_secs(5))
        .with_max_iterations_without_improvement(50)
        .with_granularity(8)
        .with_gls_lambda_coefficient(0.2)
        .with_span_coefficients(10, 20, 30)
        .with_seed(99)
        .with_parallel(false);

    assert_eq!(config.time_limit, Duration::from_secs(5));
    assert_eq!(config.max_iterations_without_improvement, 50);
    assert_eq!(config.granularity, 8);
    assert_eq!(config.gls_lambda_coefficient, 0.2);
    assert_eq!(config.distance_span_coefficient, 10);
    assert_eq!(config.time_span_coefficient, 20);
    assert_eq!(config.stops_span_coefficient, 30);
    assert_eq!(config.seed, 99);
    assert!(!config.parallel);

    let defaults = Config::default();
    assert_eq!(defaults.time_limit, Duration::from_secs(30));
    assert_eq!(defaults.stops_span_coefficient, 100);
    assert!(defaults.parallel);
}

#[test]
fn test_constraints_validation() {
    assert!(Constraints::new(1, 1, 1).is_ok());
    assert!(matches!(
        Constraints::new(0, 1, 1),
        Err(EngineError::InvalidConstraint { .. })
    ));
    assert!(Constraints::new(1, 0, 1).is_err());
    assert!(Constraints::new(1, 1, 0).is_err());

    let constraints = Constraints::new(100, 50, 2).unwrap();
    assert!(constraints.admits(100, 50, 2));
    assert!(!constraints.admits(101, 50, 2));
    assert!(!constraints.admits(100, 51, 2));
    assert!(!constraints.admits(100, 50, 3));
}

#[test]
fn test_travel_matrix() {
    let matrix = TravelMatrix::new(vec![
        vec![(0u64, 0u64), (60, 1_000)],
        vec![(90, 1_500), (0, 0)],
    ])
    .unwrap();

    assert_eq!(matrix.size(), 2);
    assert_eq!(matrix.get(1, 0), Travel::new(90, 1_500));
    assert_eq!(matrix.duration(0, 1), 60);
    assert_eq!(matrix.distance(1, 0), 1_500);

    let ragged = TravelMatrix::new(vec![vec![(0u64, 0u64), (1, 1)], vec![(1, 1)]]);
    assert_eq!(
        ragged.unwrap_err(),
        EngineError::RaggedMatrix {
            row: 1,
            len: 1,
            expected: 2
        }
    );
}

#[test]
fn test_error_classification() {
    assert!(EngineError::NoVehicles.is_input_error());
    assert!(EngineError::EmptyStopList.is_input_error());
    assert!(!EngineError::NoFeasibleSolution.is_input_error());
    assert_eq!(EngineError::NoVehicles.to_string(), "no vehicles available");
}

#[test]
fn test_travel_matrix_deserialization_checks_shape() {
    let json = r#"[
        [{"duration_seconds": 0, "distance_meters": 0}, {"duration_seconds": 60, "distance_meters": 900}],
        [{"duration_seconds": 75, "distance_meters": 950}, {"duration_seconds": 0, "distance_meters": 0}]
    ]"#;
    let matrix: TravelMatrix = serde_json::from_str(json).unwrap();
    assert_eq!(matrix.duration(1, 0), 75);
    assert_eq!(serde_json::to_value(&matrix).unwrap()[0][1]["distance_meters"], 900);

    let ragged = r#"[[{"duration_seconds": 0, "distance_meters": 0}], []]"#;
    assert!(serde_json::from_str::<TravelMatrix>(ragged).is_err());
}

#[test]
fn test_constraints_deserialization_checks_limits() {
    let constraints: Constraints = serde_json::from_str(
        r#"{"max_distance_meters": 1000, "max_duration_seconds": 60, "max_stops_per_vehicle": 2}"#,
    )
    .unwrap();
    assert_eq!(constraints, Constraints::new(1_000, 60, 2).unwrap());

    let zero_time = serde_json::from_str::<Constraints>(
        r#"{"max_distance_meters": 1000, "max_duration_seconds": 0, "max_stops_per_vehicle": 2}"#,
    );
    assert!(zero_time
        .unwrap_err()
        .to_string()
        .contains("max_duration_seconds"));
}
