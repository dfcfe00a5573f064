use crate::utils::time::NO_TIME;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One timesheet row: every entry that started on `date`, folded together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Earliest clock-in among completed entries, local wall-clock.
    pub first_in: Option<NaiveDateTime>,
    /// Latest clock-out among completed entries, local wall-clock.
    pub last_out: Option<NaiveDateTime>,
    pub hours: f64,
    pub earnings: f64,
    pub completed: usize,
    pub open: usize,
}

impl DaySummary {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            first_in: None,
            last_out: None,
            hours: 0.0,
            earnings: 0.0,
            completed: 0,
            open: 0,
        }
    }

    pub fn has_activity(&self) -> bool {
        self.completed > 0
    }

    pub fn clock_in_label(&self) -> String {
        label(self.first_in)
    }

    pub fn clock_out_label(&self) -> String {
        label(self.last_out)
    }
}

fn label(t: Option<NaiveDateTime>) -> String {
    t.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| NO_TIME.to_string())
}
