//! Unit conversion and formatting helpers.

/// Meters per mile used by the settings layer.
pub const MILES_TO_METERS: f64 = 1609.34;
pub const HOURS_TO_SECONDS: f64 = 3600.0;

pub fn meters_to_miles(meters: u64) -> f64 {
    meters as f64 / MILES_TO_METERS
}

pub fn seconds_to_hours(seconds: u64) -> f64 {
    seconds as f64 / HOURS_TO_SECONDS
}

pub fn seconds_to_minutes(seconds: u64) -> f64 {
    seconds as f64 / 60.0
}

/// Format a duration in seconds as hours, minutes, and seconds.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{} hours, {} minutes, {} seconds", hours, minutes, seconds)
}

/// Format a distance in meters as miles with two decimals.
pub fn format_miles(meters: u64) -> String {
    format!("{:.2} miles", meters_to_miles(meters))
}

/// Relative saving from `before` to `after`, in percent.
pub fn percent_saved(before: u64, after: u64) -> f64 {
    if before == 0 {
        return 0.0;
    }
    (before as f64 - after as f64) / before as f64 * 100.0
}
