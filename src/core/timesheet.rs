//! Day-by-day aggregation of time entries for a timesheet export.

use crate::models::{Client, DaySummary, TimeEntry};
use crate::utils::date::days_inclusive;
use chrono::{NaiveDate, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub hours: f64,
    pub earnings: f64,
    pub active_days: usize,
    /// Running sessions that were left out of the sums.
    pub open_entries: usize,
}

impl Totals {
    /// Sum of the rows, so the footer always matches the table above it.
    pub fn from_days(days: &[DaySummary]) -> Self {
        days.iter().fold(Totals::default(), |mut t, d| {
            t.hours += d.hours;
            t.earnings += d.earnings;
            t.open_entries += d.open;
            if d.has_activity() {
                t.active_days += 1;
            }
            t
        })
    }
}

/// Everything an export renders: the client header, one row per calendar
/// day and the period totals.
#[derive(Debug, Clone, Serialize)]
pub struct Timesheet {
    pub client: Client,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DaySummary>,
    pub totals: Totals,
}

impl Timesheet {
    pub fn build<Tz: TimeZone>(
        client: Client,
        start: NaiveDate,
        end: NaiveDate,
        entries: &[TimeEntry],
        tz: &Tz,
    ) -> Self {
        let days = summarize_days(start, end, entries, tz);
        let totals = Totals::from_days(&days);
        Self {
            client,
            start,
            end,
            days,
            totals,
        }
    }
}

/// One summary per day in `[start, end]`, in order, whether or not the day
/// has entries. Entries are bucketed by the local date of their clock-in;
/// entries outside the range are ignored.
pub fn summarize_days<Tz: TimeZone>(
    start: NaiveDate,
    end: NaiveDate,
    entries: &[TimeEntry],
    tz: &Tz,
) -> Vec<DaySummary> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&TimeEntry>> = BTreeMap::new();
    for e in entries {
        by_date.entry(e.local_date(tz)).or_default().push(e);
    }

    days_inclusive(start, end)
        .into_iter()
        .map(|date| match by_date.get(&date) {
            Some(day_entries) => summarize_day(date, day_entries, tz),
            None => DaySummary::empty(date),
        })
        .collect()
}

/// Earliest clock-in, latest clock-out, and the sum of each completed
/// entry's stored hours and earnings. Two sessions 09-12 and 13-17 give
/// 7 hours, not the 8 spanned by 09-17.
fn summarize_day<Tz: TimeZone>(date: NaiveDate, entries: &[&TimeEntry], tz: &Tz) -> DaySummary {
    let mut day = DaySummary::empty(date);

    for e in entries {
        let (Some(out), Some(hours), Some(earnings)) = (e.clock_out, e.hours_worked, e.earnings)
        else {
            day.open += 1;
            continue;
        };

        let local_in = e.clock_in.with_timezone(tz).naive_local();
        let local_out = out.with_timezone(tz).naive_local();

        day.first_in = Some(day.first_in.map_or(local_in, |t| t.min(local_in)));
        day.last_out = Some(day.last_out.map_or(local_out, |t| t.max(local_out)));
        day.hours += hours;
        day.earnings += earnings;
        day.completed += 1;
    }

    day
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn closed(id: i64, start: &str, end: &str, hours: f64, rate: f64) -> TimeEntry {
        TimeEntry {
            id,
            client_id: 1,
            clock_in: ts(start),
            clock_out: Some(ts(end)),
            hours_worked: Some(hours),
            earnings: Some(hours * rate),
            created_at: start.to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn disjoint_sessions_sum_stored_hours() {
        let entries = vec![
            closed(1, "2024-03-04T09:00:00Z", "2024-03-04T12:00:00Z", 3.0, 50.0),
            closed(2, "2024-03-04T13:00:00Z", "2024-03-04T17:00:00Z", 4.0, 50.0),
        ];
        let days = summarize_days(date(2024, 3, 4), date(2024, 3, 4), &entries, &Utc);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].clock_in_label(), "09:00");
        assert_eq!(days[0].clock_out_label(), "17:00");
        assert_eq!(days[0].hours, 7.0);
        assert_eq!(days[0].earnings, 350.0);
        assert_eq!(days[0].completed, 2);
    }

    #[test]
    fn open_entries_are_counted_but_not_summed() {
        let mut open = closed(3, "2024-03-05T08:00:00Z", "2024-03-05T09:00:00Z", 1.0, 10.0);
        open.clock_out = None;
        open.hours_worked = None;
        open.earnings = None;

        let days = summarize_days(date(2024, 3, 5), date(2024, 3, 5), &[open], &Utc);
        assert_eq!(days[0].open, 1);
        assert!(!days[0].has_activity());
        assert_eq!(days[0].hours, 0.0);
        assert_eq!(days[0].clock_in_label(), "--:--");
    }

    #[test]
    fn grouping_uses_local_date() {
        let tz = chrono::FixedOffset::west_opt(5 * 3600).unwrap();
        // 02:00 UTC on the 6th is 21:00 on the 5th at UTC-5.
        let e = closed(4, "2024-03-06T02:00:00Z", "2024-03-06T03:00:00Z", 1.0, 20.0);
        let days = summarize_days(date(2024, 3, 5), date(2024, 3, 6), &[e], &tz);
        assert_eq!(days[0].hours, 1.0);
        assert_eq!(days[0].clock_in_label(), "21:00");
        assert_eq!(days[1].hours, 0.0);
    }

    #[test]
    fn totals_match_row_sums() {
        let entries = vec![
            closed(1, "2024-01-01T09:00:00Z", "2024-01-01T10:15:00Z", 1.25, 33.33),
            closed(2, "2024-01-03T09:00:00Z", "2024-01-03T11:40:00Z", 2.67, 33.33),
            closed(3, "2024-01-03T12:00:00Z", "2024-01-03T12:20:00Z", 0.33, 33.33),
        ];
        let days = summarize_days(date(2024, 1, 1), date(2024, 1, 7), &entries, &Utc);
        let totals = Totals::from_days(&days);

        assert_eq!(days.len(), 7);
        assert_eq!(totals.active_days, 2);
        let hours: f64 = days.iter().map(|d| d.hours).sum();
        let earnings: f64 = days.iter().map(|d| d.earnings).sum();
        assert_eq!(format!("{:.2}", hours), format!("{:.2}", totals.hours));
        assert_eq!(format!("{:.2}", earnings), format!("{:.2}", totals.earnings));
        assert_eq!(format!("{:.2}", totals.hours), "4.25");
    }
}
