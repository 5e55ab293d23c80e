//! Tests for address deduplication.

use delivery_routing::dedup::{deduplicate, total_required};
use delivery_routing::problem::Stop;

#[test]
fn test_deduplicate_counts_and_order() {
    let raw = ["12 High St", "3 Mill Lane", "12 High St", "7 Park Rd", "12 High St"];

    let stops = deduplicate(&raw);

    assert_eq!(
        stops,
        vec![
            Stop::new("12 High St", 3, 1),
            Stop::new("3 Mill Lane", 1, 2),
            Stop::new("7 Park Rd", 1, 3),
        ]
    );
    assert_eq!(total_required(&stops), 5);
}

#[test]
fn test_deduplicate_trims_and_skips_blank_lines() {
    let raw = vec!["  A  ".to_string(), "".to_string(), "   ".to_string(), "A".to_string()];

    let stops = deduplicate(&raw);

    assert_eq!(stops.len(), 1);
    assert_eq!(stops[0].address, "A");
    assert_eq!(stops[0].required_count, 2);
}

#[test]
fn test_deduplicate_is_case_sensitive() {
    let stops = deduplicate(&["Main St", "main st", "MAIN ST"]);

    assert_eq!(stops.len(), 3);
    assert!(stops.iter().all(|stop| stop.required_count == 1));
    assert_eq!(
        stops.iter().map(|s| s.matrix_index).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn test_deduplicate_empty_input() {
    let raw: [&str; 0] = [];
    assert!(deduplicate(&raw).is_empty());
}
