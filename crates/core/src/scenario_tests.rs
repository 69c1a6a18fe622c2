//! Catalog to ledger to payment, end to end.

use bursar_shared::types::{
    AcademicYearId, ClassId, FeeHeadId, FeeStructureId, PaymentEventId, StudentId, UserId,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::catalog::{
    AcademicYear, CatalogService, FeeFrequency, FeeHead, FeeStructure, FeeStructureConfig,
};
use crate::ledger::{
    AllocationRecord, EnrollmentContext, FeeStructureResolver, LedgerBuilder, LedgerStatus,
};
use crate::payment::{CollectPaymentInput, PaymentAllocator, PaymentMode, SelectedItem};

struct School {
    year: AcademicYear,
    class_id: ClassId,
    candidates: Vec<(FeeStructure, FeeHead)>,
}

impl School {
    fn new() -> Self {
        Self {
            year: AcademicYear {
                id: AcademicYearId::new(),
                name: "2025-26".to_string(),
                start_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            },
            class_id: ClassId::new(),
            candidates: Vec::new(),
        }
    }

    fn configure(&mut self, name: &str, frequency: FeeFrequency, amount: Decimal) {
        let head = FeeHead {
            id: FeeHeadId::new(),
            name: name.to_string(),
            new_student_only: false,
        };
        let config = FeeStructureConfig {
            class_id: self.class_id,
            academic_year_id: self.year.id,
            fee_head_id: head.id,
            amount,
            frequency,
            due_date: None,
            stream: None,
            subject_count: None,
        };
        for row in CatalogService::plan_structure(&config, &self.year).unwrap() {
            let structure = FeeStructure {
                id: FeeStructureId::new(),
                class_id: row.class_id,
                academic_year_id: row.academic_year_id,
                fee_head_id: row.fee_head_id,
                amount: row.amount,
                frequency: row.frequency,
                due_date: row.due_date,
                stream: row.stream,
                subject_count: row.subject_count,
            };
            self.candidates.push((structure, head.clone()));
        }
    }

    fn enroll(&self) -> EnrollmentContext {
        EnrollmentContext {
            student_id: StudentId::new(),
            academic_year_id: self.year.id,
            class_id: self.class_id,
            section_id: None,
            stream: None,
            subject_count: None,
            is_new_student: true,
        }
    }
}

#[test]
fn test_admission_and_tuition_scenario() {
    let mut school = School::new();
    school.configure("Admission Fee", FeeFrequency::OneTime, dec!(20000));
    school.configure("Tuition Fee", FeeFrequency::Monthly, dec!(5000));
    let student = school.enroll();
    let today = NaiveDate::from_ymd_opt(2025, 4, 5).unwrap();

    let instances = FeeStructureResolver::resolve(&student, &school.candidates);
    let ledger = LedgerBuilder::build(student.student_id, school.year.id, &instances, &[], today);

    assert_eq!(ledger.lines().count(), 13);
    assert_eq!(ledger.summary.total_due, dec!(80000));
    assert_eq!(ledger.monthly_fees.len(), 12);
    assert_eq!(ledger.other_fees.len(), 1);

    let april = &ledger.monthly_fees[0];
    let may = &ledger.monthly_fees[1];
    assert_eq!(april.month_label.as_deref(), Some("April 2025"));
    assert_eq!(april.month_short.as_deref(), Some("Apr"));
    assert_eq!(may.month_label.as_deref(), Some("May 2025"));
    assert!(ledger.other_fees[0].month_label.is_none());

    let input = CollectPaymentInput {
        student_id: student.student_id,
        academic_year_id: school.year.id,
        items: vec![
            SelectedItem { fee_structure_id: april.fee_structure_id, balance_as_known: april.balance },
            SelectedItem { fee_structure_id: may.fee_structure_id, balance_as_known: may.balance },
        ],
        total_amount: dec!(5000),
        mode: PaymentMode::Cash,
        transaction_reference: None,
        remarks: None,
        collected_by: UserId::new(),
    };
    let plan = PaymentAllocator::plan(&input).unwrap();
    assert_eq!(plan.allocations.len(), 1);
    assert_eq!(plan.allocations[0].fee_structure_id, april.fee_structure_id);

    let event_id = PaymentEventId::new();
    let allocations: Vec<AllocationRecord> = plan
        .allocations
        .iter()
        .map(|a| AllocationRecord {
            fee_structure_id: a.fee_structure_id,
            payment_event_id: event_id,
            amount_paid: a.amount,
            payment_date: Utc.with_ymd_and_hms(2025, 4, 5, 5, 0, 0).unwrap(),
        })
        .collect();
    let after = LedgerBuilder::build(student.student_id, school.year.id, &instances, &allocations, today);

    assert_eq!(after.summary.total_due, dec!(75000));
    assert_eq!(after.summary.total_paid, dec!(5000));
    let april_after = after.line(april.fee_structure_id).unwrap();
    assert_eq!(april_after.status, LedgerStatus::Paid);
    assert_eq!(april_after.last_payment_event_id, Some(event_id));
    assert_eq!(after.line(may.fee_structure_id).unwrap().status, LedgerStatus::Pending);
}

#[test]
fn test_stale_balance_after_concurrent_payment() {
    let mut school = School::new();
    school.configure("Exam Fee", FeeFrequency::OneTime, dec!(500));
    let student = school.enroll();
    let instances = FeeStructureResolver::resolve(&student, &school.candidates);
    let fee = instances[0].fee_structure_id;

    // Both operators saw 500 outstanding; the first recorded 300.
    let seen = [SelectedItem { fee_structure_id: fee, balance_as_known: dec!(500) }];
    let fresh = std::collections::HashMap::from([(fee, dec!(200))]);
    let result = PaymentAllocator::check_fresh_balances(&seen, &fresh);
    assert!(matches!(
        result,
        Err(crate::payment::PaymentError::StaleBalance { actual, .. }) if actual == dec!(200)
    ));
}
