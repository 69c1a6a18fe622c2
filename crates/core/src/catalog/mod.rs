//! Fee catalog: fee heads, fee structures, and the academic calendar.
//!
//! Structures are configuration data. Monthly heads are materialised as
//! twelve independent rows at configuration time so that every payment
//! allocates against exactly one structure row regardless of frequency.

pub mod calendar;
pub mod error;
pub mod service;
pub mod types;

pub use calendar::{
    AcademicCalendar, MONTHLY_DUE_DAY, MONTHS_PER_YEAR, month_label, month_short,
};
pub use error::CatalogError;
pub use service::CatalogService;
pub use types::{
    AcademicYear, FeeFrequency, FeeHead, FeeStructure, FeeStructureConfig, NewFeeHead,
    PlannedStructureRow,
};
