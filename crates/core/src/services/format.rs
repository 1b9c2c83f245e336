//! Display formatting shared by the derived series and the deposit countdown.
//!
//! Rounding happens here and only here; every accumulator upstream keeps
//! full precision.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// `"+3.40%"`, `"-1.20%"`, `"0.00%"`.
pub fn format_signed_pct(value: f64) -> String {
    let rounded = round2(value);
    if rounded > 0.0 {
        format!("+{rounded:.2}%")
    } else if rounded < 0.0 {
        format!("{rounded:.2}%")
    } else {
        "0.00%".to_string()
    }
}

/// `part / total * 100`, or 0 when `total` is zero or the result is not finite.
pub fn percent_of(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    let pct = part / total * 100.0;
    if pct.is_finite() {
        pct
    } else {
        0.0
    }
}

/// `"{minutes}m {seconds}s"` for a positive remaining time.
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}

/// Coarse age of an event relative to `now`: "just now", "5m ago", "2h ago", "3d ago".
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 60 * 24 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (60 * 24))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn signed_pct_formats_sign_and_two_decimals() {
        assert_eq!(format_signed_pct(3.4), "+3.40%");
        assert_eq!(format_signed_pct(-1.2), "-1.20%");
        assert_eq!(format_signed_pct(0.0), "0.00%");
        // rounds to zero, no "-0.00%"
        assert_eq!(format_signed_pct(-0.001), "0.00%");
        assert_eq!(format_signed_pct(2.005 + 1e-9), "+2.01%");
    }

    #[test]
    fn percent_of_zero_denominator_is_zero() {
        assert_eq!(percent_of(3.0, 0.0), 0.0);
        assert_eq!(percent_of(0.0, 0.0), 0.0);
        assert_eq!(percent_of(1.0, 4.0), 25.0);
    }

    #[test]
    fn countdown_splits_minutes_and_seconds() {
        assert_eq!(format_countdown(Duration::from_millis(125_900)), "2m 5s");
        assert_eq!(format_countdown(Duration::from_millis(999)), "0m 0s");
        assert_eq!(format_countdown(Duration::from_secs(20 * 60)), "20m 0s");
    }

    #[test]
    fn relative_age_buckets() {
        let now = Utc.with_ymd_and_hms(2025, 11, 22, 12, 0, 0).unwrap();
        assert_eq!(relative_age(now, now), "just now");
        assert_eq!(relative_age(now - chrono::Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_age(now - chrono::Duration::hours(2), now), "2h ago");
        assert_eq!(relative_age(now - chrono::Duration::days(3), now), "3d ago");
    }
}
