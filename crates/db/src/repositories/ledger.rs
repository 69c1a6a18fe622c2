//! Ledger read path: student ledgers, payment history, receipts and
//! balance statements. Nothing here writes.

use bursar_core::ledger::{AllocationRecord, FeeStructureResolver, LedgerBuilder, StudentLedger};
use bursar_core::reports::{BalanceStatement, CollectionAggregator, PaymentHistoryEntry};
use bursar_shared::types::{AcademicYearId, PageRequest, PageResponse, PaymentEventId, StudentId};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;
use uuid::Uuid;

use super::catalog::CatalogRepository;
use super::enrollment::{EnrollmentError, EnrollmentRepository};
use super::history::history_entries;
use crate::entities::{payment_allocations, payment_events, students};

/// A receipt with the paying student.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptView {
    /// Paying student.
    pub student_id: StudentId,
    /// Student name.
    pub student_name: String,
    /// Admission number.
    pub admission_no: String,
    /// Receipt details.
    #[serde(flatten)]
    pub payment: PaymentHistoryEntry,
}

/// Ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds a student's ledger for an academic year as of `today`.
    ///
    /// A student with no applicable structure gets an empty ledger with
    /// `configured = false`.
    pub async fn get_ledger(
        &self,
        student_id: StudentId,
        academic_year_id: AcademicYearId,
        today: NaiveDate,
    ) -> Result<StudentLedger, EnrollmentError> {
        let ctx = EnrollmentRepository::new(self.db.clone())
            .enrollment_context(student_id, academic_year_id)
            .await?;
        let candidates = CatalogRepository::new(self.db.clone())
            .candidates_for(ctx.class_id, academic_year_id)
            .await?;

        let instances = FeeStructureResolver::resolve(&ctx, &candidates);
        let structure_ids: Vec<Uuid> = instances
            .iter()
            .map(|i| i.fee_structure_id.into_inner())
            .collect();
        let allocations = self.allocations_for(student_id, structure_ids).await?;

        Ok(LedgerBuilder::build(
            student_id,
            academic_year_id,
            &instances,
            &allocations,
            today,
        ))
    }

    async fn allocations_for(
        &self,
        student_id: StudentId,
        structure_ids: Vec<Uuid>,
    ) -> Result<Vec<AllocationRecord>, DbErr> {
        if structure_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = payment_allocations::Entity::find()
            .filter(payment_allocations::Column::StudentId.eq(student_id.into_inner()))
            .filter(payment_allocations::Column::FeeStructureId.is_in(structure_ids))
            .find_also_related(payment_events::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(alloc, event)| {
                let event = event?;
                Some(AllocationRecord {
                    fee_structure_id: alloc.fee_structure_id.into(),
                    payment_event_id: alloc.payment_event_id.into(),
                    amount_paid: alloc.amount_paid,
                    payment_date: event.payment_date.with_timezone(&Utc),
                })
            })
            .collect())
    }

    /// A student's receipts, newest first.
    pub async fn payment_history(
        &self,
        student_id: StudentId,
        page: PageRequest,
    ) -> Result<PageResponse<PaymentHistoryEntry>, EnrollmentError> {
        EnrollmentRepository::new(self.db.clone())
            .find_student(student_id)
            .await?;
        let page = page.normalized();

        let query = payment_events::Entity::find()
            .filter(payment_events::Column::StudentId.eq(student_id.into_inner()));
        let total = query.clone().count(&self.db).await?;
        let events = query
            .order_by_desc(payment_events::Column::PaymentDate)
            .order_by_desc(payment_events::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let entries = history_entries(&self.db, events).await?;
        Ok(PageResponse::new(entries, page.page, page.per_page, total))
    }

    /// Looks up a single receipt.
    pub async fn receipt(&self, payment_event_id: PaymentEventId) -> Result<Option<ReceiptView>, DbErr> {
        let Some((event, student)) = payment_events::Entity::find_by_id(payment_event_id.into_inner())
            .find_also_related(students::Entity)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let Some(student) = student else {
            return Ok(None);
        };

        let payment = history_entries(&self.db, vec![event]).await?.into_iter().next();
        Ok(payment.map(|payment| ReceiptView {
            student_id: student.id.into(),
            student_name: student.name,
            admission_no: student.admission_no,
            payment,
        }))
    }

    /// Ledger plus every receipt of the student for the academic year.
    pub async fn balance_statement(
        &self,
        student_id: StudentId,
        academic_year_id: AcademicYearId,
        today: NaiveDate,
    ) -> Result<BalanceStatement, EnrollmentError> {
        let ledger = self.get_ledger(student_id, academic_year_id, today).await?;

        let events = payment_events::Entity::find()
            .filter(payment_events::Column::StudentId.eq(student_id.into_inner()))
            .filter(payment_events::Column::AcademicYearId.eq(academic_year_id.into_inner()))
            .all(&self.db)
            .await?;
        let payments = history_entries(&self.db, events).await?;

        Ok(CollectionAggregator::balance_statement(&ledger, payments))
    }
}
