//! Collapse a raw address list into unique stops.

use crate::problem::Stop;
use std::collections::HashMap;

/// Deduplicate raw addresses into [`Stop`]s.
///
/// Addresses are trimmed and blank entries skipped. Matching is case-sensitive
/// and exact; the first appearance fixes the order, and each stop gets the
/// matrix index it would have in `[depot] + stops` (starting at 1).
pub fn deduplicate<S: AsRef<str>>(raw_addresses: &[S]) -> Vec<Stop> {
    let mut stops: Vec<Stop> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for raw in raw_addresses {
        let address = raw.as_ref().trim();
        if address.is_empty() {
            continue;
        }

        match positions.get(address) {
            Some(&pos) => stops[pos].required_count += 1,
            None => {
                positions.insert(address, stops.len());
                let matrix_index = stops.len() + 1;
                stops.push(Stop::new(address, 1, matrix_index));
            }
        }
    }

    stops
}

/// Total number of deliveries requested across all stops.
pub fn total_required(stops: &[Stop]) -> usize {
    stops.iter().map(|stop| stop.required_count).sum()
}
