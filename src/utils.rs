//! Reporting helpers for tours and run summaries.

use std::time::Duration;

/// Format an elapsed duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Format an absolute clock value (hours since day 1, 00:00) as
/// "Day D, HH:MM". Arrival times returned by the route evaluator are
/// already absolute, so they can be passed straight through.
pub fn format_clock(hours: f64) -> String {
    let day = (hours / 24.0).floor() as u64 + 1;
    let hour_of_day = hours.rem_euclid(24.0);
    let whole_hours = hour_of_day.floor();
    let minutes = ((hour_of_day - whole_hours) * 60.0).floor() as u64;

    format!("Day {}, {:02}:{:02}", day, whole_hours as u64, minutes)
}
