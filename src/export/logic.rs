use crate::core::timesheet::Timesheet;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::{ensure_writable, write_atomically};
use crate::export::json_csv::{render_csv, render_json};
use crate::export::pdf::{Layout, render_timesheet};
use crate::export::request::{ExportRequest, file_name};
use crate::export::source::{StoreSource, TimesheetSource};
use crate::export::{ExportFormat, RenderContext, notify_export_success};
use crate::ui::messages::{info, warning};
use chrono::{Local, TimeZone};
use std::path::{Path, PathBuf};

/// A finished document, fully rendered in memory.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

/// High-level export logic.
pub struct ExportLogic;

/// Store errors surface as `Fetch` during an export, whatever their origin.
fn into_fetch(e: AppError) -> AppError {
    match e {
        AppError::Fetch(_) => e,
        other => AppError::fetch(other),
    }
}

impl ExportLogic {
    /// Validate, fetch and aggregate.
    ///
    /// Validation runs before the source is touched. The client is looked up
    /// in the fetched client list, after the entries are in hand.
    pub fn build_timesheet<S: TimesheetSource, Tz: TimeZone>(
        source: &mut S,
        request: &ExportRequest,
        tz: &Tz,
    ) -> AppResult<Timesheet> {
        let req = request.validate()?;

        let clients = source.list_clients().map_err(into_fetch)?;
        let entries = source
            .list_time_entries(req.client_id, req.start, req.end)
            .map_err(into_fetch)?;

        let client = clients
            .into_iter()
            .find(|c| c.id == req.client_id)
            .ok_or_else(|| AppError::NotFound(format!("client #{}", req.client_id)))?;

        Ok(Timesheet::build(client, req.start, req.end, &entries, tz))
    }

    /// Encode a timesheet in the requested format.
    pub fn render(
        sheet: &Timesheet,
        format: ExportFormat,
        ctx: &RenderContext,
    ) -> AppResult<ExportArtifact> {
        let bytes = match format {
            ExportFormat::Pdf => render_timesheet(sheet, ctx, Layout::default()),
            ExportFormat::Csv => render_csv(sheet, ctx)?,
            ExportFormat::Json => render_json(sheet)?,
        };

        Ok(ExportArtifact {
            file_name: file_name(
                &ctx.app_name,
                &sheet.client.name,
                sheet.start,
                sheet.end,
                format.extension(),
            ),
            format,
            bytes,
        })
    }

    /// Full export against the local database, written into `out_dir`.
    /// Returns the path of the written file.
    pub fn export(
        pool: &DbPool,
        request: &ExportRequest,
        format: ExportFormat,
        out_dir: &Path,
        force: bool,
        ctx: &RenderContext,
    ) -> AppResult<PathBuf> {
        let mut source = StoreSource::new(pool, Local);
        let sheet = Self::build_timesheet(&mut source, request, &Local)?;

        if sheet.totals.open_entries > 0 {
            warning(format!(
                "{} running session(s) in this period are not included in the totals.",
                sheet.totals.open_entries
            ));
        }

        let artifact = Self::render(&sheet, format, ctx)?;
        let path = out_dir.join(&artifact.file_name);

        info(format!(
            "Exporting {} days for '{}' to {}: {}",
            sheet.days.len(),
            sheet.client.name,
            artifact.format.label(),
            path.display()
        ));

        ensure_writable(&path, force)?;
        write_atomically(&path, &artifact.bytes)?;

        ttlog_soft(
            &pool.conn,
            "export",
            &format!("#{}", sheet.client.id),
            &format!(
                "{} {} to {}: {:.2} h, {:.2}",
                artifact.format.label(),
                sheet.start,
                sheet.end,
                sheet.totals.hours,
                sheet.totals.earnings
            ),
        );

        notify_export_success(artifact.format.label(), &path);
        Ok(path)
    }
}
