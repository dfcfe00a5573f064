use crate::core::timesheet::Timesheet;
use crate::errors::{AppError, AppResult};
use crate::export::RenderContext;
use serde::Serialize;

/// Flat CSV row, one per calendar day.
#[derive(Serialize)]
struct DayRow {
    date: String,
    clock_in: String,
    clock_out: String,
    hours: String,
    earnings: String,
    entries: usize,
}

/// Timesheet as pretty-printed JSON (client, range, days and totals).
pub(crate) fn render_json(sheet: &Timesheet) -> AppResult<Vec<u8>> {
    serde_json::to_vec_pretty(sheet)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))
}

/// Timesheet as CSV (header included thanks to serde).
pub(crate) fn render_csv(sheet: &Timesheet, ctx: &RenderContext) -> AppResult<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    for day in &sheet.days {
        wtr.serialize(DayRow {
            date: day.date.format(&ctx.date_format).to_string(),
            clock_in: day.clock_in_label(),
            clock_out: day.clock_out_label(),
            hours: format!("{:.2}", day.hours),
            earnings: format!("{:.2}", day.earnings),
            entries: day.completed,
        })
        .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Export(format!("CSV flush error: {e}")))
}
