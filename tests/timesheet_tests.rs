use chrono::{DateTime, NaiveDate, Utc};
use timely::core::timesheet::Timesheet;
use timely::errors::{AppError, AppResult};
use timely::export::pdf::{Layout, TimesheetPdf, render_timesheet};
use timely::export::{ExportFormat, ExportLogic, ExportRequest, RenderContext, TimesheetSource};
use timely::models::{Client, TimeEntry};

/// In-memory source that counts how often it is asked for data.
#[derive(Default)]
struct FakeSource {
    clients: Vec<Client>,
    entries: Vec<TimeEntry>,
    fail_entries: bool,
    client_calls: usize,
    entry_calls: usize,
}

impl TimesheetSource for FakeSource {
    fn list_clients(&mut self) -> AppResult<Vec<Client>> {
        self.client_calls += 1;
        Ok(self.clients.clone())
    }

    fn list_time_entries(
        &mut self,
        client_id: i64,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> AppResult<Vec<TimeEntry>> {
        self.entry_calls += 1;
        if self.fail_entries {
            return Err(AppError::Db(rusqlite::Error::InvalidQuery));
        }
        Ok(self
            .entries
            .iter()
            .filter(|e| e.client_id == client_id)
            .cloned()
            .collect())
    }
}

fn acme() -> Client {
    Client {
        id: 1,
        name: "Acme & Co.".into(),
        hourly_rate: 40.0,
        created_at: "2024-01-01T00:00:00Z".into(),
    }
}

fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn entry(id: i64, start: &str, end: &str, hours: f64) -> TimeEntry {
    TimeEntry {
        id,
        client_id: 1,
        clock_in: ts(start),
        clock_out: Some(ts(end)),
        hours_worked: Some(hours),
        earnings: Some(hours * 40.0),
        created_at: start.into(),
    }
}

fn source_with_data() -> FakeSource {
    FakeSource {
        clients: vec![acme()],
        entries: vec![
            entry(1, "2024-01-02T09:00:00Z", "2024-01-02T12:00:00Z", 3.0),
            entry(2, "2024-01-02T13:00:00Z", "2024-01-02T15:30:00Z", 2.5),
            entry(3, "2024-01-20T08:00:00Z", "2024-01-20T09:00:00Z", 1.0),
        ],
        ..Default::default()
    }
}

fn count(haystack: &[u8], needle: &str) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle.as_bytes())
        .count()
}

#[test]
fn test_validation_happens_before_any_fetch() {
    let mut src = source_with_data();

    let reversed = ExportRequest::new(1, "2024-02-01", "2024-01-01");
    let err = ExportLogic::build_timesheet(&mut src, &reversed, &Utc).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let no_client = ExportRequest {
        client_id: None,
        start: Some("2024-01-01".into()),
        end: Some("2024-01-31".into()),
    };
    let err = ExportLogic::build_timesheet(&mut src, &no_client, &Utc).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert_eq!(src.client_calls, 0);
    assert_eq!(src.entry_calls, 0);
}

#[test]
fn test_store_failure_surfaces_as_fetch_error() {
    let mut src = source_with_data();
    src.fail_entries = true;

    let req = ExportRequest::new(1, "2024-01-01", "2024-01-31");
    let err = ExportLogic::build_timesheet(&mut src, &req, &Utc).unwrap_err();

    assert!(matches!(err, AppError::Fetch(_)));
    assert_eq!(src.entry_calls, 1);
}

#[test]
fn test_unknown_client_is_not_found() {
    let mut src = source_with_data();
    let req = ExportRequest::new(7, "2024-01-01", "2024-01-31");

    let err = ExportLogic::build_timesheet(&mut src, &req, &Utc).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_timesheet_has_one_row_per_day_and_matching_totals() {
    let mut src = source_with_data();
    let req = ExportRequest::new(1, "2024-01-01", "2024-01-31");

    let sheet = ExportLogic::build_timesheet(&mut src, &req, &Utc).unwrap();

    assert_eq!(sheet.days.len(), 31);
    assert_eq!(sheet.days[1].hours, 5.5);
    assert_eq!(sheet.days[1].clock_in_label(), "09:00");
    assert_eq!(sheet.days[1].clock_out_label(), "15:30");
    assert_eq!(sheet.totals.active_days, 2);

    let hours: f64 = sheet.days.iter().map(|d| d.hours).sum();
    let earnings: f64 = sheet.days.iter().map(|d| d.earnings).sum();
    assert_eq!(sheet.totals.hours, hours);
    assert_eq!(sheet.totals.earnings, earnings);
    assert_eq!(format!("{:.2}", sheet.totals.earnings), "260.00");
}

#[test]
fn test_rendered_artifact_uses_sanitized_name() {
    let mut src = source_with_data();
    let req = ExportRequest::new(1, "2024-01-01", "2024-01-07");
    let sheet = ExportLogic::build_timesheet(&mut src, &req, &Utc).unwrap();

    let artifact =
        ExportLogic::render(&sheet, ExportFormat::Pdf, &RenderContext::default()).unwrap();

    assert_eq!(
        artifact.file_name,
        "TIMELY_Acme___Co__2024-01-01_to_2024-01-07.pdf"
    );
    assert!(artifact.bytes.starts_with(b"%PDF-"));
}

#[test]
fn test_short_range_fits_on_one_page() {
    let sheet = Timesheet::build(
        acme(),
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        &[],
        &Utc,
    );

    let mut doc = TimesheetPdf::new(Layout::default());
    doc.write_timesheet(&sheet, &RenderContext::default());
    assert_eq!(doc.page_count(), 1);

    let bytes = render_timesheet(&sheet, &RenderContext::default(), Layout::default());
    assert_eq!(count(&bytes, "(TOTALS:)"), 1);
    assert_eq!(count(&bytes, "(0.00 hours)"), 1);
}

#[test]
fn test_long_range_paginates_without_duplicates() {
    let src = source_with_data();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
    let sheet = Timesheet::build(acme(), start, end, &src.entries, &Utc);
    assert_eq!(sheet.days.len(), 121);

    let layout = Layout::default();
    let ctx = RenderContext::default();

    let mut doc = TimesheetPdf::new(layout);
    doc.write_timesheet(&sheet, &ctx);
    let pages = doc.page_count();
    assert!(pages >= 4);

    let bytes = render_timesheet(&sheet, &ctx, layout);

    // Column band repeated on every page, totals drawn once at the end.
    assert_eq!(count(&bytes, "(Clock In)"), pages);
    assert_eq!(count(&bytes, "(TOTALS:)"), 1);
    assert_eq!(count(&bytes, "(Timesheet Report)"), 1);

    for day in &sheet.days {
        let cell = format!("({})", day.date.format("%Y-%m-%d"));
        assert_eq!(count(&bytes, &cell), 1, "{cell} should appear exactly once");
    }

    assert_eq!(count(&bytes, "(6.50 hours)"), 1);
}
