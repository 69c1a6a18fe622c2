//! Payment write path.
//!
//! Every collection runs inside one transaction: advisory locks per
//! (student, obligation) in sorted order, a check that every selected
//! obligation applies to the student, a fresh re-read of what each
//! obligation has received, then the event and its allocations. The
//! deferred triggers from the fee ledger migration re-check the
//! no-overpayment rule at commit.

use std::collections::HashMap;

use bursar_core::ledger::FeeStructureResolver;
use bursar_core::payment::{
    AllocationPlan, CollectPaymentInput, PaymentAllocator, PaymentError, PaymentOutcome,
    RECEIPT_SUFFIX_MAX, RECEIPT_SUFFIX_MIN, RecordedAllocation, receipt_number,
};
use bursar_shared::types::{FeeStructureId, PaymentAllocationId, PaymentEventId, format_money};
use chrono::Utc;
use chrono_tz::Tz;
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set, Statement,
    TransactionTrait,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::catalog::load_candidates;
use super::enrollment::{EnrollmentError, load_enrollment_context};
use crate::entities::{payment_allocations, payment_events};

/// Attempts at drawing an unused receipt number before giving up.
const RECEIPT_ATTEMPTS: usize = 20;

const ADVISORY_LOCK_SQL: &str = "SELECT pg_advisory_xact_lock(hashtextextended($1, 0))";

/// Records payments.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
    timezone: Tz,
}

impl PaymentRepository {
    /// Creates a payment repository. `timezone` dates receipt numbers.
    #[must_use]
    pub const fn new(db: DatabaseConnection, timezone: Tz) -> Self {
        Self { db, timezone }
    }

    /// Validates, allocates and atomically records a payment.
    ///
    /// Validation failures return before a transaction is opened. Any error
    /// after that drops the transaction, so nothing is written.
    pub async fn collect_payment(
        &self,
        input: CollectPaymentInput,
    ) -> Result<PaymentOutcome, PaymentError> {
        let plan = PaymentAllocator::plan(&input)?;

        let txn = self.db.begin().await.map_err(persistence_failure)?;
        let outcome = self.record(&txn, &input, &plan).await?;
        txn.commit().await.map_err(persistence_failure)?;

        info!(
            student_id = %input.student_id,
            payment_event_id = %outcome.payment_event_id,
            receipt_number = %outcome.receipt_number,
            total_amount = %format_money(outcome.total_amount),
            allocations = outcome.allocations.len(),
            "Payment recorded"
        );
        Ok(outcome)
    }

    async fn record(
        &self,
        txn: &DatabaseTransaction,
        input: &CollectPaymentInput,
        plan: &AllocationPlan,
    ) -> Result<PaymentOutcome, PaymentError> {
        let mut ids: Vec<FeeStructureId> = input.items.iter().map(|i| i.fee_structure_id).collect();
        ids.sort();
        for id in &ids {
            lock_obligation(txn, &format!("{}:{id}", input.student_id))
                .await
                .map_err(persistence_failure)?;
        }

        let amounts = applicable_amounts(txn, input).await?;
        if let Some(missing) = input
            .items
            .iter()
            .find(|i| !amounts.contains_key(&i.fee_structure_id))
        {
            return Err(PaymentError::UnknownObligation(missing.fee_structure_id));
        }

        let raw_ids: Vec<Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        let paid: HashMap<FeeStructureId, Decimal> = payment_allocations::Entity::find()
            .select_only()
            .column(payment_allocations::Column::FeeStructureId)
            .column_as(payment_allocations::Column::AmountPaid.sum(), "total_paid")
            .filter(payment_allocations::Column::StudentId.eq(input.student_id.into_inner()))
            .filter(payment_allocations::Column::FeeStructureId.is_in(raw_ids))
            .group_by(payment_allocations::Column::FeeStructureId)
            .into_tuple::<(Uuid, Decimal)>()
            .all(txn)
            .await
            .map_err(persistence_failure)?
            .into_iter()
            .map(|(id, total)| (id.into(), total))
            .collect();

        let fresh: HashMap<FeeStructureId, Decimal> = amounts
            .iter()
            .filter(|(id, _)| ids.contains(id))
            .map(|(id, amount)| {
                let received = paid.get(id).copied().unwrap_or(Decimal::ZERO);
                (*id, (*amount - received).max(Decimal::ZERO))
            })
            .collect();
        if let Err(err) = PaymentAllocator::check_fresh_balances(&input.items, &fresh) {
            warn!(student_id = %input.student_id, error = %err, "Rejected payment against stale balance");
            return Err(err);
        }

        let now = Utc::now();
        let receipt = self.unused_receipt_number(txn, now).await?;
        let event_id = PaymentEventId::new();

        payment_events::ActiveModel {
            id: Set(event_id.into_inner()),
            receipt_number: Set(receipt.clone()),
            student_id: Set(input.student_id.into_inner()),
            academic_year_id: Set(input.academic_year_id.into_inner()),
            mode: Set(input.mode.into()),
            transaction_reference: Set(input.transaction_reference.clone()),
            remarks: Set(input.remarks.clone()),
            payment_date: Set(now.fixed_offset()),
            total_amount: Set(plan.total_amount),
            collected_by: Set(input.collected_by.into_inner()),
            created_at: Set(now.fixed_offset()),
        }
        .insert(txn)
        .await
        .map_err(persistence_failure)?;

        let mut allocations = Vec::with_capacity(plan.allocations.len());
        for planned in &plan.allocations {
            let id = PaymentAllocationId::new();
            payment_allocations::ActiveModel {
                id: Set(id.into_inner()),
                payment_event_id: Set(event_id.into_inner()),
                student_id: Set(input.student_id.into_inner()),
                fee_structure_id: Set(planned.fee_structure_id.into_inner()),
                amount_paid: Set(planned.amount),
                created_at: Set(now.fixed_offset()),
            }
            .insert(txn)
            .await
            .map_err(persistence_failure)?;

            allocations.push(RecordedAllocation {
                id,
                fee_structure_id: planned.fee_structure_id,
                amount_paid: planned.amount,
            });
        }

        Ok(PaymentOutcome {
            payment_event_id: event_id,
            receipt_number: receipt,
            total_amount: plan.total_amount,
            payment_date: now,
            allocations,
        })
    }

    async fn unused_receipt_number(
        &self,
        txn: &DatabaseTransaction,
        now: chrono::DateTime<Utc>,
    ) -> Result<String, PaymentError> {
        let date = now.with_timezone(&self.timezone).date_naive();
        for _ in 0..RECEIPT_ATTEMPTS {
            let suffix = rand::rng().random_range(RECEIPT_SUFFIX_MIN..=RECEIPT_SUFFIX_MAX);
            let candidate = receipt_number(date, suffix);
            let taken = payment_events::Entity::find()
                .filter(payment_events::Column::ReceiptNumber.eq(candidate.as_str()))
                .count(txn)
                .await
                .map_err(persistence_failure)?;
            if taken == 0 {
                return Ok(candidate);
            }
        }
        Err(PaymentError::PersistenceFailure(format!(
            "no free receipt number for {date}"
        )))
    }
}

/// Amounts of the structures that apply to the paying student in the year.
///
/// Rows of another class, a non-matching stream or subject count, or a
/// new-admission head for a returning student are absent.
async fn applicable_amounts(
    txn: &DatabaseTransaction,
    input: &CollectPaymentInput,
) -> Result<HashMap<FeeStructureId, Decimal>, PaymentError> {
    let ctx = match load_enrollment_context(txn, input.student_id, input.academic_year_id).await {
        Ok(ctx) => ctx,
        Err(EnrollmentError::Database(err)) => return Err(persistence_failure(err)),
        Err(_) => return Ok(HashMap::new()),
    };
    let candidates = load_candidates(txn, ctx.class_id, ctx.academic_year_id)
        .await
        .map_err(persistence_failure)?;

    Ok(candidates
        .iter()
        .filter(|(structure, head)| FeeStructureResolver::applies(&ctx, structure, head))
        .map(|(structure, _)| (structure.id, structure.amount))
        .collect())
}

async fn lock_obligation(txn: &DatabaseTransaction, key: &str) -> Result<(), DbErr> {
    txn.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        ADVISORY_LOCK_SQL,
        [key.into()],
    ))
    .await?;
    Ok(())
}

fn persistence_failure(err: DbErr) -> PaymentError {
    error!(error = %err, "Payment transaction failed");
    PaymentError::PersistenceFailure(err.to_string())
}
