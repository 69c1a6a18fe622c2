//! Ledger construction.

use std::collections::HashMap;

use bursar_shared::types::{AcademicYearId, FeeStructureId, PaymentEventId, StudentId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::catalog::{FeeFrequency, month_label, month_short};

use super::types::{
    AllocationRecord, HeadGroup, LedgerLine, LedgerStatus, LedgerSummary, ObligationInstance,
    StudentLedger,
};

/// Derives the status of a line.
///
/// Priority: nothing left to pay is `PAID`; something paid is `PARTIAL`;
/// nothing paid and past due is `OVERDUE`; otherwise `PENDING`. A line due
/// today is not yet overdue.
#[must_use]
pub fn derive_status(
    amount: Decimal,
    total_paid: Decimal,
    due_date: NaiveDate,
    today: NaiveDate,
) -> LedgerStatus {
    let balance = (amount - total_paid).max(Decimal::ZERO);
    if balance.is_zero() {
        LedgerStatus::Paid
    } else if total_paid > Decimal::ZERO {
        LedgerStatus::Partial
    } else if due_date < today {
        LedgerStatus::Overdue
    } else {
        LedgerStatus::Pending
    }
}

#[derive(Default)]
struct PaidSoFar {
    total: Decimal,
    last: Option<(DateTime<Utc>, PaymentEventId)>,
}

/// Joins obligations with allocations.
pub struct LedgerBuilder;

impl LedgerBuilder {
    /// Builds the ledger for one student and academic year.
    ///
    /// Lines keep the order of `instances`. Allocations for structures that
    /// are not among the instances are ignored.
    #[must_use]
    pub fn build(
        student_id: StudentId,
        academic_year_id: AcademicYearId,
        instances: &[ObligationInstance],
        allocations: &[AllocationRecord],
        today: NaiveDate,
    ) -> StudentLedger {
        let mut paid: HashMap<FeeStructureId, PaidSoFar> = HashMap::new();
        for alloc in allocations {
            let entry = paid.entry(alloc.fee_structure_id).or_default();
            entry.total += alloc.amount_paid;
            let newer = entry
                .last
                .is_none_or(|(date, _)| alloc.payment_date >= date);
            if newer {
                entry.last = Some((alloc.payment_date, alloc.payment_event_id));
            }
        }

        let mut monthly_fees = Vec::new();
        let mut other_fees = Vec::new();
        let mut heads: Vec<HeadGroup> = Vec::new();
        let mut summary = LedgerSummary::default();

        for instance in instances {
            let line = Self::line(instance, paid.get(&instance.fee_structure_id), today);

            summary.total_demand += line.amount;
            summary.total_paid += line.total_paid;
            summary.total_due += line.balance;
            summary.counts.record(line.status);

            match heads
                .iter_mut()
                .find(|g| g.fee_head_id == line.fee_head_id && g.frequency == line.frequency)
            {
                Some(group) => {
                    group.amount += line.amount;
                    group.total_paid += line.total_paid;
                    group.balance += line.balance;
                    group.lines.push(line.clone());
                }
                None => heads.push(HeadGroup {
                    fee_head_id: line.fee_head_id,
                    head_name: line.head_name.clone(),
                    frequency: line.frequency,
                    amount: line.amount,
                    total_paid: line.total_paid,
                    balance: line.balance,
                    lines: vec![line.clone()],
                }),
            }

            match line.frequency {
                FeeFrequency::Monthly => monthly_fees.push(line),
                FeeFrequency::OneTime => other_fees.push(line),
            }
        }

        StudentLedger {
            student_id,
            academic_year_id,
            configured: !instances.is_empty(),
            monthly_fees,
            other_fees,
            heads,
            summary,
        }
    }

    fn line(
        instance: &ObligationInstance,
        paid: Option<&PaidSoFar>,
        today: NaiveDate,
    ) -> LedgerLine {
        let total_paid = paid.map_or(Decimal::ZERO, |p| p.total);
        if total_paid > instance.amount {
            tracing::warn!(
                student_id = %instance.student_id,
                fee_structure_id = %instance.fee_structure_id,
                amount = %instance.amount,
                total_paid = %total_paid,
                "obligation overpaid; balance floored at zero"
            );
        }
        let balance = (instance.amount - total_paid).max(Decimal::ZERO);
        let last = paid.and_then(|p| p.last);
        let monthly = instance.frequency == FeeFrequency::Monthly;

        LedgerLine {
            fee_structure_id: instance.fee_structure_id,
            fee_head_id: instance.fee_head_id,
            head_name: instance.head_name.clone(),
            frequency: instance.frequency,
            amount: instance.amount,
            total_paid,
            balance,
            status: derive_status(instance.amount, total_paid, instance.due_date, today),
            due_date: instance.due_date,
            month_label: monthly.then(|| {
                instance
                    .month_label
                    .clone()
                    .unwrap_or_else(|| month_label(instance.due_date))
            }),
            month_short: monthly.then(|| month_short(instance.due_date)),
            last_payment_date: last.map(|(date, _)| date),
            last_payment_event_id: last.map(|(_, id)| id),
        }
    }
}
