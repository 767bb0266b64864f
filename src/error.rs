//! Error types for Vitalis Analytics
//!
//! The analytics computations themselves never fail; errors only surface at the
//! boundaries where input is parsed, windows are resolved or configuration is loaded.

use thiserror::Error;

/// Errors that can occur around an analytics computation
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported analytics window: {0} days (expected 7, 14 or 30)")]
    InvalidWindow(u32),

    #[error("Date parse error: {0}")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

/// Input-contract violations reported by [`crate::types::AnalyticsInput::validate`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Duplicate daily record for {date}")]
    DuplicateDate { date: String },

    #[error("Negative {field} on {date}: {value}")]
    NegativeValue {
        date: String,
        field: &'static str,
        value: f64,
    },

    #[error("Sleep score out of range on {date}: {value} (expected 0-10)")]
    SleepScoreOutOfRange { date: String, value: f64 },

    #[error("Non-positive weight sample on {date}: {value}")]
    InvalidWeight { date: String, value: f64 },
}
