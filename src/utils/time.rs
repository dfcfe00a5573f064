//! Time utilities: elapsed durations, hour rounding, clock formatting.

use chrono::{DateTime, TimeZone, Utc};

/// Placeholder shown when a day has no clock-in/out to display.
pub const NO_TIME: &str = "--:--";

/// Round to cents / hundredths of an hour.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Fractional hours between two instants (unrounded).
pub fn hours_between(start: &DateTime<Utc>, end: &DateTime<Utc>) -> f64 {
    (*end - *start).num_seconds() as f64 / 3600.0
}

/// "HH:MM:SS" for a running session.
pub fn format_elapsed(seconds: i64) -> String {
    let s = seconds.max(0);
    format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}

/// Wall-clock "HH:MM" of an instant in `tz`.
pub fn clock_in_zone<Tz: TimeZone>(t: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    t.with_timezone(tz).format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(2.675_000_1), 2.68);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn format_elapsed_pads_fields() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(3_725), "01:02:05");
        assert_eq!(format_elapsed(-5), "00:00:00");
    }
}
