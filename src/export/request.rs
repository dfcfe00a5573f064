use crate::errors::{AppError, AppResult};
use crate::utils::date::require_date;
use crate::utils::formatting::sanitize_file_component;
use chrono::NaiveDate;

/// Raw export parameters as collected from the user. Every field is
/// optional here so that "nothing selected" is reported as a validation
/// error rather than a CLI parse failure.
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    pub client_id: Option<i64>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// A request that passed validation: client chosen, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub client_id: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ExportRequest {
    pub fn new(client_id: i64, start: &str, end: &str) -> Self {
        Self {
            client_id: Some(client_id),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
        }
    }

    pub fn validate(&self) -> AppResult<ValidatedRequest> {
        let client_id = self
            .client_id
            .ok_or_else(|| AppError::Validation("no client selected".into()))?;

        let start = require_date("start", self.start.as_deref())?;
        let end = require_date("end", self.end.as_deref())?;

        if start > end {
            return Err(AppError::Validation(format!(
                "start date {start} is after end date {end}"
            )));
        }

        Ok(ValidatedRequest {
            client_id,
            start,
            end,
        })
    }
}

impl ValidatedRequest {
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// `<App>_<Client>_<start>_to_<end>.<ext>`, with the client name reduced
/// to `[A-Za-z0-9_]`.
pub fn file_name(
    app_name: &str,
    client_name: &str,
    start: NaiveDate,
    end: NaiveDate,
    ext: &str,
) -> String {
    format!(
        "{}_{}_{}_to_{}.{}",
        sanitize_file_component(app_name),
        sanitize_file_component(client_name),
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d"),
        ext
    )
}
