//! Report types.

use bursar_shared::types::{AcademicYearId, FeeHeadId, FeeStructureId, PaymentEventId, StudentId};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReportError;
use crate::ledger::LedgerLine;
use crate::payment::PaymentMode;

/// Label used when a student has no current enrollment.
pub const UNKNOWN_CLASS: &str = "Unknown";

/// Inclusive range of local calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day.
    pub from: NaiveDate,
    /// Last day, inclusive.
    pub to: NaiveDate,
}

impl DateRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidRange` if `from > to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, ReportError> {
        if from > to {
            return Err(ReportError::InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// A single day.
    #[must_use]
    pub const fn day(date: NaiveDate) -> Self {
        Self { from: date, to: date }
    }

    /// Half-open UTC instants `[start of from, start of the day after to)` in `tz`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::UnresolvableDate` if a boundary has no local midnight.
    pub fn utc_bounds(&self, tz: Tz) -> Result<(DateTime<Utc>, DateTime<Utc>), ReportError> {
        let end_day = self
            .to
            .checked_add_days(Days::new(1))
            .ok_or(ReportError::UnresolvableDate(self.to))?;
        Ok((local_midnight(self.from, tz)?, local_midnight(end_day, tz)?))
    }
}

fn local_midnight(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, ReportError> {
    tz.from_local_datetime(&date.and_time(chrono::NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(ReportError::UnresolvableDate(date))
}

/// Local hours shown as individual chart buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    start: u32,
    end: u32,
}

impl HourWindow {
    /// Creates a window covering `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidHourWindow` unless `start <= end <= 23`.
    pub fn new(start: u32, end: u32) -> Result<Self, ReportError> {
        if start > end || end > 23 {
            return Err(ReportError::InvalidHourWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// First hour in the window.
    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Last hour in the window.
    #[must_use]
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// Returns true if `hour` gets its own bucket.
    #[must_use]
    pub const fn contains(&self, hour: u32) -> bool {
        hour >= self.start && hour <= self.end
    }
}

impl Default for HourWindow {
    fn default() -> Self {
        Self { start: 7, end: 21 }
    }
}

/// Grouping of a collection report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// By payment mode.
    Mode,
    /// By local hour of day.
    Hour,
    /// By current class and section.
    Class,
    /// By local calendar day.
    Day,
}

impl std::str::FromStr for GroupBy {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mode" => Ok(Self::Mode),
            "hour" => Ok(Self::Hour),
            "class" => Ok(Self::Class),
            "day" => Ok(Self::Day),
            _ => Err(ReportError::UnknownGroupBy(s.to_string())),
        }
    }
}

/// One persisted payment event as seen by reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRecord {
    pub payment_event_id: PaymentEventId,
    pub receipt_number: String,
    pub student_id: StudentId,
    pub student_name: String,
    pub admission_no: Option<String>,
    /// Current "Class - Section" label; `None` when not enrolled.
    pub class_label: Option<String>,
    pub mode: PaymentMode,
    pub transaction_reference: Option<String>,
    pub total_amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub collected_by: Option<String>,
}

/// Collections for one payment mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeTotal {
    pub mode: PaymentMode,
    pub amount: Decimal,
    pub count: u32,
    /// Percentage of the grand total, two decimal places.
    pub share: Decimal,
}

/// Collections within one local hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourTotal {
    pub hour: u32,
    /// "07:00" style label.
    pub label: String,
    pub amount: Decimal,
    pub count: u32,
}

/// Hourly buckets plus what fell outside the chart window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourBreakdown {
    pub buckets: Vec<HourTotal>,
    pub outside_window: Decimal,
    pub outside_window_count: u32,
}

/// Collections for one class label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassTotal {
    pub class_label: String,
    pub amount: Decimal,
    pub count: u32,
}

/// Collections on one local date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTotal {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub count: u32,
}

/// Grouped rows of a collection report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "groupBy", content = "rows", rename_all = "lowercase")]
pub enum CollectionBreakdown {
    /// By payment mode.
    Mode(Vec<ModeTotal>),
    /// By local hour.
    Hour(HourBreakdown),
    /// By class label.
    Class(Vec<ClassTotal>),
    /// By local date.
    Day(Vec<DayTotal>),
}

/// Collections over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_amount: Decimal,
    pub payment_count: u32,
    #[serde(flatten)]
    pub breakdown: CollectionBreakdown,
}

/// One line of the daily collection listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    pub payment_event_id: PaymentEventId,
    pub receipt_number: String,
    pub student_id: StudentId,
    pub student_name: String,
    pub admission_no: Option<String>,
    pub class_label: String,
    pub mode: PaymentMode,
    pub transaction_reference: Option<String>,
    pub amount: Decimal,
    /// Local time of the payment.
    pub paid_at: NaiveDateTime,
    pub collected_by: Option<String>,
}

/// Listing and totals for a range of days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub entries: Vec<DailyEntry>,
    pub total_amount: Decimal,
    pub payment_count: u32,
    pub by_mode: Vec<ModeTotal>,
}

/// A payment event header for history views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEvent {
    pub payment_event_id: PaymentEventId,
    pub receipt_number: String,
    pub payment_date: DateTime<Utc>,
    pub mode: PaymentMode,
    pub transaction_reference: Option<String>,
    pub remarks: Option<String>,
    pub total_amount: Decimal,
    pub collected_by: Option<String>,
}

/// One allocation inside a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub fee_structure_id: FeeStructureId,
    pub head_name: String,
    pub month_label: Option<String>,
    pub amount_paid: Decimal,
}

/// A receipt with its allocation items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHistoryEntry {
    pub payment_event_id: PaymentEventId,
    pub receipt_number: String,
    pub payment_date: DateTime<Utc>,
    pub mode: PaymentMode,
    pub transaction_reference: Option<String>,
    pub remarks: Option<String>,
    pub total_amount: Decimal,
    pub collected_by: Option<String>,
    pub items: Vec<HistoryItem>,
}

/// Per-head subtotal in a balance statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadSubtotal {
    pub fee_head_id: FeeHeadId,
    pub head_name: String,
    pub amount: Decimal,
    pub total_paid: Decimal,
    pub balance: Decimal,
}

/// Grand totals of a balance statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementTotals {
    pub total_demand: Decimal,
    pub total_paid: Decimal,
    pub total_balance: Decimal,
}

/// Full ledger and payment history of a student for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceStatement {
    pub student_id: StudentId,
    pub academic_year_id: AcademicYearId,
    pub lines: Vec<LedgerLine>,
    pub heads: Vec<HeadSubtotal>,
    pub totals: StatementTotals,
    pub payments: Vec<PaymentHistoryEntry>,
}
