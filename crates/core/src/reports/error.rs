//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while preparing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// `from` is after `to`.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange {
        /// Start of range.
        from: NaiveDate,
        /// End of range.
        to: NaiveDate,
    },

    /// A local date cannot be mapped to an instant in the school's time zone.
    #[error("Date {0} cannot be resolved in the configured time zone")]
    UnresolvableDate(NaiveDate),

    /// Hour window bounds are out of order or beyond 23.
    #[error("Invalid hour window {start}..={end}")]
    InvalidHourWindow {
        /// First hour shown.
        start: u32,
        /// Last hour shown.
        end: u32,
    },

    /// Unknown grouping requested.
    #[error("Unknown grouping: {0}")]
    UnknownGroupBy(String),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        "VALIDATION_ERROR"
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        400
    }
}
