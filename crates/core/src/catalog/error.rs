//! Catalog error types.

use bursar_shared::types::{AcademicYearId, ClassId, FeeHeadId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while configuring fee heads and fee structures.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Fee head name is empty after trimming.
    #[error("Fee head name cannot be empty")]
    EmptyHeadName,

    /// A fee head with this name already exists.
    #[error("Fee head already exists: {0}")]
    DuplicateHeadName(String),

    /// Fee head not found.
    #[error("Fee head not found: {0}")]
    HeadNotFound(FeeHeadId),

    /// Class not found.
    #[error("Class not found: {0}")]
    ClassNotFound(ClassId),

    /// Academic year not found.
    #[error("Academic year not found: {0}")]
    AcademicYearNotFound(AcademicYearId),

    /// Structure amount must be strictly positive.
    #[error("Fee amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// Structure amount has more than two decimal places.
    #[error("Fee amount has more than two decimal places: {0}")]
    TooPrecise(Decimal),

    /// Subject count narrowing must be positive.
    #[error("Subject count must be greater than zero, got {0}")]
    InvalidSubjectCount(i32),

    /// Explicit due date is outside the academic year.
    #[error("Due date {0} is outside the academic year")]
    DueDateOutsideYear(NaiveDate),

    /// The academic year cannot be mapped onto calendar dates.
    #[error("Academic year starting {0} is out of calendar range")]
    CalendarOutOfRange(i32),

    /// A structure for the same class, year, head and narrowing already exists.
    #[error("Fee structure already configured for this class, year and fee head")]
    AlreadyConfigured,
}

impl CatalogError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyHeadName
            | Self::NonPositiveAmount(_)
            | Self::TooPrecise(_)
            | Self::InvalidSubjectCount(_)
            | Self::DueDateOutsideYear(_)
            | Self::CalendarOutOfRange(_) => "VALIDATION_ERROR",
            Self::DuplicateHeadName(_) | Self::AlreadyConfigured => "CONFLICT",
            Self::HeadNotFound(_) | Self::ClassNotFound(_) | Self::AcademicYearNotFound(_) => {
                "NOT_FOUND"
            }
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::EmptyHeadName
            | Self::NonPositiveAmount(_)
            | Self::TooPrecise(_)
            | Self::InvalidSubjectCount(_)
            | Self::DueDateOutsideYear(_)
            | Self::CalendarOutOfRange(_) => 400,
            Self::DuplicateHeadName(_) | Self::AlreadyConfigured => 409,
            Self::HeadNotFound(_) | Self::ClassNotFound(_) | Self::AcademicYearNotFound(_) => 404,
        }
    }
}
