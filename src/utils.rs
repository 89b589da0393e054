/// Utility functions for data processing and formatting
use time::{format_description, OffsetDateTime, UtcOffset};

/// Fixed UTC offset used for all displayed timestamps.
///
/// Feed timestamps arrive in UTC; the monitor is deployed at UTC-3 and all
/// rendered times use that zone regardless of DST.
pub fn display_offset() -> UtcOffset {
    UtcOffset::from_hms(-3, 0, 0).expect("valid fixed offset")
}

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD/MM/YYYY HH:MM:SS format.
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    let format = format_description::parse("[day]/[month]/[year] [hour]:[minute]:[second]")
        .expect("Failed to create format description");
    dt.format(&format).unwrap_or_else(|_| dt.to_string())
}

/// Convert a time::Duration to seconds as u64
///
/// Helper function to work with duration calculations in the main loop.
pub fn duration_to_seconds(duration: time::Duration) -> u64 {
    duration.whole_seconds() as u64
}

/// Round to two decimal digits with ties going to the even neighbour.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
