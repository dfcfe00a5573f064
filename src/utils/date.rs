use crate::errors::{AppError, AppResult};
use chrono::{
    DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse a mandatory date argument. Missing and malformed values are both
/// validation failures so that nothing is fetched with a half-built range.
pub fn require_date(label: &str, value: Option<&str>) -> AppResult<NaiveDate> {
    let raw = value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation(format!("missing {label} date")))?;

    parse_date(raw).ok_or_else(|| {
        AppError::Validation(format!("invalid {label} date '{raw}' (expected YYYY-MM-DD)"))
    })
}

/// Every calendar day from `start` to `end`, both included.
/// Returns an empty list when `start > end`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// UTC instant at which `date` begins in `tz`.
///
/// When DST skips local midnight, the day begins at the first wall-clock
/// time that exists after it.
pub fn day_start_utc<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    first_valid_instant(date.and_time(NaiveTime::MIN), |t| {
        tz.from_local_datetime(t).map(|d| d.with_timezone(&Utc))
    })
}

/// Walk forward from `start` in 15-minute steps until `resolve` yields an
/// instant; ambiguous times take the earlier reading.
fn first_valid_instant<F>(start: NaiveDateTime, resolve: F) -> DateTime<Utc>
where
    F: Fn(&NaiveDateTime) -> LocalResult<DateTime<Utc>>,
{
    let step = Duration::minutes(15);
    let mut t = start;
    for _ in 0..=96 {
        if let Some(instant) = resolve(&t).earliest() {
            return instant;
        }
        t += step;
    }
    Utc.from_utc_datetime(&start)
}

/// Half-open UTC window `[start 00:00, end+1 00:00)` covering the local
/// calendar days of an inclusive date range.
pub fn local_range_utc<Tz: TimeZone>(
    start: NaiveDate,
    end: NaiveDate,
    tz: &Tz,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let after_end = end.succ_opt().unwrap_or(end);
    (day_start_utc(start, tz), day_start_utc(after_end, tz))
}

/// Parse a `--at` value ("YYYY-MM-DD HH:MM", local time) into UTC.
pub fn parse_local_timestamp(s: &str) -> AppResult<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M"))
        .map_err(|_| AppError::InvalidTime(format!("'{s}' (expected YYYY-MM-DD HH:MM)")))?;

    match Local.from_local_datetime(&naive) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => Ok(t.with_timezone(&Utc)),
        LocalResult::None => Err(AppError::InvalidTime(format!(
            "'{s}' does not exist in the local time zone"
        ))),
    }
}

/// Optional `--at` flag, defaulting to the current instant.
pub fn timestamp_or_now(at: Option<&String>) -> AppResult<DateTime<Utc>> {
    match at {
        Some(s) => parse_local_timestamp(s),
        None => Ok(Utc::now()),
    }
}

/// Storage format for every timestamp column: RFC 3339, UTC, whole seconds.
/// Fixed width keeps lexical order equal to chronological order in SQL.
pub fn to_db_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

pub fn from_db_timestamp(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidTime(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn days_inclusive_counts_both_ends() {
        let s = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        let e = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let days = days_inclusive(s, e);
        assert_eq!(days.len(), 5);
        assert_eq!(days.first(), Some(&s));
        assert_eq!(days.last(), Some(&e));
        assert!(days.contains(&NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
    }

    #[test]
    fn days_inclusive_is_empty_for_reversed_range() {
        let s = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let e = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert!(days_inclusive(s, e).is_empty());
    }

    #[test]
    fn local_range_respects_offset() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let (from, to) = local_range_utc(d, d, &tz);
        assert_eq!(to_db_timestamp(&from), "2024-02-29T22:00:00Z");
        assert_eq!(to_db_timestamp(&to), "2024-03-01T22:00:00Z");
    }

    #[test]
    fn skipped_midnight_starts_day_at_end_of_gap() {
        use chrono::Timelike;

        // UTC-3 zone whose clocks jump from 00:00 to 01:00 on this day.
        let resolve = |t: &NaiveDateTime| {
            if t.hour() == 0 {
                LocalResult::None
            } else {
                LocalResult::Single(Utc.from_utc_datetime(&(*t + Duration::hours(3))))
            }
        };
        let midnight = NaiveDate::from_ymd_opt(2018, 11, 4)
            .unwrap()
            .and_time(NaiveTime::MIN);

        let start = first_valid_instant(midnight, resolve);
        assert_eq!(to_db_timestamp(&start), "2018-11-04T04:00:00Z");
    }

    #[test]
    fn ambiguous_midnight_takes_earlier_reading() {
        let early = Utc.with_ymd_and_hms(2024, 3, 1, 2, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 3, 1, 3, 0, 0).unwrap();
        let midnight = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_time(NaiveTime::MIN);

        let start = first_valid_instant(midnight, |_| LocalResult::Ambiguous(early, late));
        assert_eq!(start, early);
    }

    #[test]
    fn require_date_rejects_missing_and_garbage() {
        assert!(matches!(
            require_date("start", None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            require_date("start", Some("  ")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            require_date("end", Some("2024-13-01")),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            require_date("end", Some("2024-01-31")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
    }
}
