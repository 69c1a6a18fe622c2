//! Payment domain types.

use bursar_shared::types::{
    AcademicYearId, FeeStructureId, PaymentAllocationId, PaymentEventId, StudentId, UserId,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a payment was tendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    /// Cash at the counter.
    Cash,
    /// UPI transfer.
    Upi,
    /// Cheque.
    Cheque,
    /// Online gateway.
    Online,
    /// Direct bank transfer.
    BankTransfer,
}

impl PaymentMode {
    /// Every mode, in reporting order.
    pub const ALL: [Self; 5] = [
        Self::Cash,
        Self::Upi,
        Self::Cheque,
        Self::Online,
        Self::BankTransfer,
    ];

    /// Stable code used in storage and APIs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Upi => "UPI",
            Self::Cheque => "CHEQUE",
            Self::Online => "ONLINE",
            Self::BankTransfer => "BANK_TRANSFER",
        }
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == code)
            .ok_or_else(|| format!("Unknown payment mode: {s}"))
    }
}

/// An obligation chosen by the operator, with the balance they saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedItem {
    /// Obligation to pay.
    pub fee_structure_id: FeeStructureId,
    /// Outstanding balance as displayed to the operator.
    pub balance_as_known: Decimal,
}

/// Request to collect one payment across several obligations.
#[derive(Debug, Clone)]
pub struct CollectPaymentInput {
    /// Paying student.
    pub student_id: StudentId,
    /// Academic year the selected obligations belong to.
    pub academic_year_id: AcademicYearId,
    /// Selected obligations, in the order the amount should be applied.
    pub items: Vec<SelectedItem>,
    /// Amount collected.
    pub total_amount: Decimal,
    /// Tender mode.
    pub mode: PaymentMode,
    /// Cheque number, UPI reference and the like.
    pub transaction_reference: Option<String>,
    /// Free-text remarks.
    pub remarks: Option<String>,
    /// Operator recording the payment.
    pub collected_by: UserId,
}

/// Amount to apply to one obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedAllocation {
    /// Obligation receiving the amount.
    pub fee_structure_id: FeeStructureId,
    /// Amount applied; always positive.
    pub amount: Decimal,
    /// Balance before this payment, as submitted.
    pub balance_before: Decimal,
}

impl PlannedAllocation {
    /// Balance left after this allocation.
    #[must_use]
    pub fn balance_after(&self) -> Decimal {
        self.balance_before - self.amount
    }
}

/// Result of splitting a collected amount over the selected obligations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
    /// Amount collected; equals the sum of allocations.
    pub total_amount: Decimal,
    /// Non-zero allocations in application order.
    pub allocations: Vec<PlannedAllocation>,
}

/// A persisted allocation returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedAllocation {
    pub id: PaymentAllocationId,
    pub fee_structure_id: FeeStructureId,
    pub amount_paid: Decimal,
}

/// Outcome of a committed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub payment_event_id: PaymentEventId,
    pub receipt_number: String,
    pub total_amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub allocations: Vec<RecordedAllocation>,
}
