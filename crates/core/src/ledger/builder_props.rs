//! Property-based tests for the ledger builder.

use bursar_shared::types::{AcademicYearId, FeeHeadId, FeeStructureId, PaymentEventId, StudentId};
use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::builder::LedgerBuilder;
use super::types::{AllocationRecord, LedgerStatus, ObligationInstance};
use crate::catalog::FeeFrequency;

/// Amounts from 0.01 to 10,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Obligations with a list of payments against each.
fn ledger_inputs() -> impl Strategy<Value = Vec<(Decimal, u32, Vec<Decimal>)>> {
    prop::collection::vec(
        (
            positive_amount(),
            1u32..=28,
            prop::collection::vec(positive_amount(), 0..4),
        ),
        0..15,
    )
}

fn materialise(
    student: StudentId,
    inputs: &[(Decimal, u32, Vec<Decimal>)],
) -> (Vec<ObligationInstance>, Vec<AllocationRecord>) {
    let mut instances = Vec::new();
    let mut allocations = Vec::new();
    for (amount, day, payments) in inputs {
        let instance = ObligationInstance {
            student_id: student,
            fee_structure_id: FeeStructureId::new(),
            fee_head_id: FeeHeadId::new(),
            head_name: "Tuition Fee".to_string(),
            frequency: FeeFrequency::Monthly,
            amount: *amount,
            due_date: NaiveDate::from_ymd_opt(2025, 6, *day).unwrap(),
            month_label: Some("June 2025".to_string()),
        };
        for payment in payments {
            allocations.push(AllocationRecord {
                fee_structure_id: instance.fee_structure_id,
                payment_event_id: PaymentEventId::new(),
                amount_paid: *payment,
                payment_date: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
            });
        }
        instances.push(instance);
    }
    (instances, allocations)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Balances are never negative and never exceed the amount.
    #[test]
    fn prop_balance_bounds(inputs in ledger_inputs()) {
        let student = StudentId::new();
        let (instances, allocations) = materialise(student, &inputs);
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let ledger = LedgerBuilder::build(student, AcademicYearId::new(), &instances, &allocations, today);

        for line in ledger.lines() {
            prop_assert!(line.balance >= Decimal::ZERO);
            prop_assert!(line.balance <= line.amount);
        }
    }

    /// Summary totals equal the sum over lines.
    #[test]
    fn prop_summary_matches_lines(inputs in ledger_inputs()) {
        let student = StudentId::new();
        let (instances, allocations) = materialise(student, &inputs);
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let ledger = LedgerBuilder::build(student, AcademicYearId::new(), &instances, &allocations, today);

        let demand: Decimal = ledger.lines().map(|l| l.amount).sum();
        let paid: Decimal = ledger.lines().map(|l| l.total_paid).sum();
        let due: Decimal = ledger.lines().map(|l| l.balance).sum();
        prop_assert_eq!(ledger.summary.total_demand, demand);
        prop_assert_eq!(ledger.summary.total_paid, paid);
        prop_assert_eq!(ledger.summary.total_due, due);

        let counts = ledger.summary.counts;
        let counted = counts.paid + counts.partial + counts.overdue + counts.pending;
        prop_assert_eq!(counted as usize, instances.len());
        prop_assert_eq!(ledger.configured, !instances.is_empty());
    }

    /// Status follows the paid amount and the due date.
    #[test]
    fn prop_status_thresholds(inputs in ledger_inputs()) {
        let student = StudentId::new();
        let (instances, allocations) = materialise(student, &inputs);
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let ledger = LedgerBuilder::build(student, AcademicYearId::new(), &instances, &allocations, today);

        for line in ledger.lines() {
            let expected = if line.total_paid >= line.amount {
                LedgerStatus::Paid
            } else if line.total_paid > Decimal::ZERO {
                LedgerStatus::Partial
            } else if line.due_date < today {
                LedgerStatus::Overdue
            } else {
                LedgerStatus::Pending
            };
            prop_assert_eq!(line.status, expected);
        }
    }
}
