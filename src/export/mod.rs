mod fs_utils;
mod json_csv;
pub mod logic;
pub mod pdf;
pub mod request;
pub mod source;

pub use logic::{ExportArtifact, ExportLogic};
pub use request::ExportRequest;
pub use source::{StoreSource, TimesheetSource};

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::Rgb;
use crate::ui::messages::success;
use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use std::fmt::Write;
use clap::ValueEnum;
use std::path::Path;

/// Shared completion message for every export format.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Pdf,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }
}

/// Presentation settings handed to the renderers. Built from the config
/// (theme included) and passed down explicitly.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub app_name: String,
    pub currency_symbol: String,
    pub date_format: String,
    pub accent: Rgb,
    /// Footer stamp, e.g. "2024-03-08 at 17:42".
    pub generated_on: String,
}

/// A date-only format: parseable, and free of time or zone specifiers that a
/// bare `NaiveDate` cannot fill in.
fn renders_dates(fmt: &str) -> bool {
    if StrftimeItems::new(fmt).any(|i| matches!(i, Item::Error)) {
        return false;
    }
    let mut out = String::new();
    write!(out, "{}", NaiveDate::MIN.format(fmt)).is_ok()
}

impl RenderContext {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        if !renders_dates(&cfg.date_format) {
            return Err(AppError::Config(format!(
                "invalid date_format '{}' (only date specifiers such as %Y %m %d are allowed)",
                cfg.date_format
            )));
        }

        Ok(Self {
            app_name: cfg.app_name.clone(),
            currency_symbol: cfg.currency_symbol.clone(),
            date_format: cfg.date_format.clone(),
            accent: cfg.theme.accent()?,
            generated_on: chrono::Local::now()
                .format("%Y-%m-%d at %H:%M")
                .to_string(),
        })
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            app_name: "TIMELY".to_string(),
            currency_symbol: "$".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            accent: Rgb(30.0 / 255.0, 58.0 / 255.0, 138.0 / 255.0),
            generated_on: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_format(fmt: &str) -> Config {
        let mut cfg: Config = serde_yaml::from_str("database: x.sqlite\n").unwrap();
        cfg.date_format = fmt.to_string();
        cfg
    }

    #[test]
    fn date_only_formats_are_accepted() {
        for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%a %e %b %Y"] {
            let ctx = RenderContext::from_config(&config_with_format(fmt)).unwrap();
            assert_eq!(ctx.date_format, fmt);
        }
    }

    #[test]
    fn time_specifiers_in_date_format_are_rejected() {
        for fmt in ["%d/%m/%Y %H:%M", "%Y-%m-%d %z", "%Q"] {
            let err = RenderContext::from_config(&config_with_format(fmt)).unwrap_err();
            assert!(matches!(err, AppError::Config(_)), "{fmt} should be rejected");
        }
    }
}
