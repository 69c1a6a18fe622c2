//! Loads payment events for collection reports.

use bursar_core::reports::CollectionRecord;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::enrollment::{EnrollmentError, EnrollmentRepository};
use super::history::user_names;
use crate::entities::{payment_events, students};

/// Collection report queries.
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    db: DatabaseConnection,
}

impl CollectionRepository {
    /// Creates a new collection repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Payment events with `start <= payment_date < end`, oldest first.
    ///
    /// Class labels come from each student's enrollment in the academic
    /// year active now, not the one at payment time.
    pub async fn records_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CollectionRecord>, DbErr> {
        let rows = payment_events::Entity::find()
            .filter(payment_events::Column::PaymentDate.gte(start))
            .filter(payment_events::Column::PaymentDate.lt(end))
            .order_by_asc(payment_events::Column::PaymentDate)
            .order_by_asc(payment_events::Column::Id)
            .find_also_related(students::Entity)
            .all(&self.db)
            .await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<Uuid> = rows.iter().map(|(e, _)| e.student_id).collect();
        let enrollments = EnrollmentRepository::new(self.db.clone());
        let labels = match enrollments.active_year().await {
            Ok(year) => enrollments.class_labels(&student_ids, year.id).await?,
            Err(EnrollmentError::Database(err)) => return Err(err),
            Err(_) => Default::default(),
        };
        let collectors = user_names(&self.db, rows.iter().map(|(e, _)| e.collected_by)).await?;

        Ok(rows
            .into_iter()
            .map(|(event, student)| CollectionRecord {
                payment_event_id: event.id.into(),
                receipt_number: event.receipt_number,
                student_id: event.student_id.into(),
                student_name: student.as_ref().map(|s| s.name.clone()).unwrap_or_default(),
                admission_no: student.map(|s| s.admission_no),
                class_label: labels.get(&event.student_id).cloned(),
                mode: event.mode.into(),
                transaction_reference: event.transaction_reference,
                total_amount: event.total_amount,
                payment_date: event.payment_date.with_timezone(&Utc),
                collected_by: collectors.get(&event.collected_by).cloned(),
            })
            .collect())
    }
}
