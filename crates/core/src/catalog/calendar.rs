//! Academic calendar conventions.
//!
//! An academic year runs April through March. Monthly fees fall due on the
//! 10th of each month; one-time fees default to 1 April. Due-date comparisons
//! in reports depend on these exact dates.

use chrono::{Datelike, NaiveDate};

use super::error::CatalogError;
use super::types::AcademicYear;

/// Day of month on which every monthly fee falls due.
pub const MONTHLY_DUE_DAY: u32 = 10;

/// Number of monthly slots in an academic year.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Calendar month in which the academic year starts.
const FIRST_MONTH: u32 = 4;

/// Calendar for one academic year, keyed by the year it starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcademicCalendar {
    start_year: i32,
}

impl AcademicCalendar {
    /// Creates a calendar for the academic year starting in `start_year`.
    #[must_use]
    pub const fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    /// Creates the calendar for an academic year record.
    #[must_use]
    pub fn for_year(year: &AcademicYear) -> Self {
        Self::new(year.start_date.year())
    }

    /// The calendar year the academic year starts in.
    #[must_use]
    pub const fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Due dates of the twelve monthly slots, April through March.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CalendarOutOfRange` for years chrono cannot represent.
    pub fn monthly_due_dates(&self) -> Result<Vec<NaiveDate>, CatalogError> {
        (0..MONTHS_PER_YEAR)
            .map(|offset| {
                let zero_based = FIRST_MONTH - 1 + offset;
                let year = self.start_year + i32::from(zero_based >= MONTHS_PER_YEAR);
                let month = zero_based % MONTHS_PER_YEAR + 1;
                NaiveDate::from_ymd_opt(year, month, MONTHLY_DUE_DAY)
                    .ok_or(CatalogError::CalendarOutOfRange(self.start_year))
            })
            .collect()
    }

    /// Default due date for one-time fees: the first day of the year.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CalendarOutOfRange` for years chrono cannot represent.
    pub fn one_time_due_date(&self) -> Result<NaiveDate, CatalogError> {
        NaiveDate::from_ymd_opt(self.start_year, FIRST_MONTH, 1)
            .ok_or(CatalogError::CalendarOutOfRange(self.start_year))
    }

    /// Returns true if `date` falls between 1 April and 31 March inclusive.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        let starts = (self.start_year, FIRST_MONTH);
        let ends_before = (self.start_year + 1, FIRST_MONTH);
        let key = (date.year(), date.month());
        key >= starts && key < ends_before
    }
}

/// Long label for the month a fee falls due in, e.g. "April 2025".
#[must_use]
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Three-letter month label, e.g. "Apr".
#[must_use]
pub fn month_short(date: NaiveDate) -> String {
    date.format("%b").to_string()
}
