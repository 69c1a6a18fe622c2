//! Ledger domain types.

use bursar_shared::types::{
    AcademicYearId, ClassId, FeeHeadId, FeeStructureId, PaymentEventId, SectionId, StudentId,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::FeeFrequency;

/// A student's enrollment facts for one academic year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentContext {
    /// Student.
    pub student_id: StudentId,
    /// Academic year the enrollment belongs to.
    pub academic_year_id: AcademicYearId,
    /// Enrolled class.
    pub class_id: ClassId,
    /// Enrolled section, if assigned.
    pub section_id: Option<SectionId>,
    /// Student's stream, if any.
    pub stream: Option<String>,
    /// Number of subjects the student takes, if recorded.
    pub subject_count: Option<i32>,
    /// Admitted this academic year.
    pub is_new_student: bool,
}

/// One applicable fee structure row for a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObligationInstance {
    /// Student owing the obligation.
    pub student_id: StudentId,
    /// Fee structure row; payments allocate against this.
    pub fee_structure_id: FeeStructureId,
    /// Fee head.
    pub fee_head_id: FeeHeadId,
    /// Fee head display name.
    pub head_name: String,
    /// Frequency of the configuration.
    pub frequency: FeeFrequency,
    /// Amount owed.
    pub amount: Decimal,
    /// Due date.
    pub due_date: NaiveDate,
    /// "April 2025" style label, monthly obligations only.
    pub month_label: Option<String>,
}

/// A persisted allocation as seen by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRecord {
    /// Obligation the allocation settles.
    pub fee_structure_id: FeeStructureId,
    /// Payment event the allocation belongs to.
    pub payment_event_id: PaymentEventId,
    /// Amount applied.
    pub amount_paid: Decimal,
    /// When the owning payment was recorded.
    pub payment_date: DateTime<Utc>,
}

/// Payment status of a ledger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerStatus {
    /// Fully settled.
    Paid,
    /// Some, but not all, of the amount is paid.
    Partial,
    /// Nothing paid and the due date has passed.
    Overdue,
    /// Nothing paid and not yet due.
    Pending,
}

impl LedgerStatus {
    /// Stable code used in APIs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "PAID",
            Self::Partial => "PARTIAL",
            Self::Overdue => "OVERDUE",
            Self::Pending => "PENDING",
        }
    }
}

impl std::fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One obligation with its payment position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerLine {
    pub fee_structure_id: FeeStructureId,
    pub fee_head_id: FeeHeadId,
    pub head_name: String,
    pub frequency: FeeFrequency,
    pub amount: Decimal,
    pub total_paid: Decimal,
    /// Never negative.
    pub balance: Decimal,
    pub status: LedgerStatus,
    pub due_date: NaiveDate,
    /// "April 2025"; monthly lines only.
    pub month_label: Option<String>,
    /// "Apr"; monthly lines only.
    pub month_short: Option<String>,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub last_payment_event_id: Option<PaymentEventId>,
}

/// Ledger lines of one fee head with subtotals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadGroup {
    pub fee_head_id: FeeHeadId,
    pub head_name: String,
    pub frequency: FeeFrequency,
    pub amount: Decimal,
    pub total_paid: Decimal,
    pub balance: Decimal,
    pub lines: Vec<LedgerLine>,
}

/// Number of lines in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub paid: u32,
    pub partial: u32,
    pub overdue: u32,
    pub pending: u32,
}

impl StatusCounts {
    /// Counts one more line in `status`.
    pub fn record(&mut self, status: LedgerStatus) {
        match status {
            LedgerStatus::Paid => self.paid += 1,
            LedgerStatus::Partial => self.partial += 1,
            LedgerStatus::Overdue => self.overdue += 1,
            LedgerStatus::Pending => self.pending += 1,
        }
    }
}

/// Ledger totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    /// Sum of line amounts.
    pub total_demand: Decimal,
    /// Sum of amounts paid.
    pub total_paid: Decimal,
    /// Sum of outstanding balances.
    pub total_due: Decimal,
    /// Lines per status.
    pub counts: StatusCounts,
}

/// A student's full ledger for one academic year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentLedger {
    pub student_id: StudentId,
    pub academic_year_id: AcademicYearId,
    /// False when no fee structure applies to the student.
    pub configured: bool,
    /// Monthly obligations.
    pub monthly_fees: Vec<LedgerLine>,
    /// One-time obligations.
    pub other_fees: Vec<LedgerLine>,
    /// All lines grouped by fee head.
    pub heads: Vec<HeadGroup>,
    pub summary: LedgerSummary,
}

impl StudentLedger {
    /// Iterates over every line, monthly first.
    pub fn lines(&self) -> impl Iterator<Item = &LedgerLine> {
        self.monthly_fees.iter().chain(self.other_fees.iter())
    }

    /// Finds the line for a fee structure.
    #[must_use]
    pub fn line(&self, fee_structure_id: FeeStructureId) -> Option<&LedgerLine> {
        self.lines().find(|l| l.fee_structure_id == fee_structure_id)
    }
}
