use crate::errors::{AppError, AppResult};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Client {
    pub id: i64,            // ⇔ clients.id
    pub name: String,       // ⇔ clients.name (trimmed, non-empty)
    pub hourly_rate: f64,   // ⇔ clients.hourly_rate (> 0)
    pub created_at: String, // ⇔ clients.created_at (RFC 3339 UTC)
}

impl Client {
    /// Trim and check a client name coming from the CLI.
    pub fn validate_name(name: &str) -> AppResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("client name must not be empty".into()));
        }
        Ok(trimmed.to_string())
    }

    pub fn validate_rate(rate: f64) -> AppResult<f64> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(AppError::Validation(format!(
                "hourly rate must be a number greater than 0 (got {rate})"
            )));
        }
        Ok(rate)
    }
}
