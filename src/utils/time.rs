//! Time helpers
//!
//! Instants are carried as `i64` Unix millis everywhere below the service
//! boundary; formatting happens at the edges.

use chrono::{DateTime, Utc};

/// Current instant as Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format an instant as `HH:MM` (24-hour, UTC)
///
/// Used in walk-in rejection messages naming the blocking reservation.
pub fn format_hhmm(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Format an instant as `YYYYMMDD`, the date part of invoice numbers
pub fn date_stamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y%m%d").to_string())
        .unwrap_or_else(|| "00000000".to_string())
}

/// Format an instant for receipt headers, e.g. `05 Mar 2024 17:35`
pub fn format_receipt_stamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%d %b %Y %H:%M").to_string())
        .unwrap_or_else(|| "--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-05 17:35:00 UTC
    const SAMPLE: i64 = 1_709_660_100_000;

    #[test]
    fn formats_hhmm() {
        assert_eq!(format_hhmm(SAMPLE), "17:35");
    }

    #[test]
    fn formats_date_stamp() {
        assert_eq!(date_stamp(SAMPLE), "20240305");
    }

    #[test]
    fn out_of_range_millis_fall_back() {
        assert_eq!(format_hhmm(i64::MAX), "--:--");
    }
}
