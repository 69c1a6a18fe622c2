//! Read access to the school directory: academic years, students and
//! enrollments.

use std::collections::HashMap;

use bursar_core::catalog::AcademicYear;
use bursar_core::ledger::EnrollmentContext;
use bursar_shared::types::{AcademicYearId, StudentId};
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{academic_years, classes, sections, student_enrollments, students};

/// Errors raised while looking up directory records.
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    /// Student not found.
    #[error("Student not found: {0}")]
    StudentNotFound(StudentId),

    /// Academic year not found.
    #[error("Academic year not found: {0}")]
    AcademicYearNotFound(AcademicYearId),

    /// Student has no enrollment in the academic year.
    #[error("Student {student_id} is not enrolled in academic year {academic_year_id}")]
    NotEnrolled {
        /// Student.
        student_id: StudentId,
        /// Academic year.
        academic_year_id: AcademicYearId,
    },

    /// No academic year is marked active.
    #[error("No active academic year")]
    NoActiveYear,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Directory lookups used by the ledger and reports.
#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    db: DatabaseConnection,
}

impl EnrollmentRepository {
    /// Creates a new enrollment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the academic year currently marked active.
    pub async fn active_year(&self) -> Result<AcademicYear, EnrollmentError> {
        academic_years::Entity::find()
            .filter(academic_years::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .map(AcademicYear::from)
            .ok_or(EnrollmentError::NoActiveYear)
    }

    /// Finds a student by ID.
    pub async fn find_student(&self, id: StudentId) -> Result<students::Model, EnrollmentError> {
        students::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(EnrollmentError::StudentNotFound(id))
    }

    /// Loads the facts fee resolution needs for a student in a year.
    pub async fn enrollment_context(
        &self,
        student_id: StudentId,
        academic_year_id: AcademicYearId,
    ) -> Result<EnrollmentContext, EnrollmentError> {
        load_enrollment_context(&self.db, student_id, academic_year_id).await
    }

    /// "Class - Section" labels of the given students in a year.
    ///
    /// Students without an enrollment are absent from the map.
    pub async fn class_labels(
        &self,
        student_ids: &[Uuid],
        academic_year_id: AcademicYearId,
    ) -> Result<HashMap<Uuid, String>, DbErr> {
        if student_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let enrollments = student_enrollments::Entity::find()
            .filter(student_enrollments::Column::StudentId.is_in(student_ids.iter().copied()))
            .filter(student_enrollments::Column::AcademicYearId.eq(academic_year_id.into_inner()))
            .all(&self.db)
            .await?;

        let class_ids: Vec<Uuid> = enrollments.iter().map(|e| e.class_id).collect();
        let section_ids: Vec<Uuid> = enrollments.iter().filter_map(|e| e.section_id).collect();

        let class_names: HashMap<Uuid, String> = classes::Entity::find()
            .filter(classes::Column::Id.is_in(class_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let section_names: HashMap<Uuid, String> = sections::Entity::find()
            .filter(sections::Column::Id.is_in(section_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        Ok(enrollments
            .into_iter()
            .filter_map(|e| {
                let class = class_names.get(&e.class_id)?;
                let label = match e.section_id.and_then(|id| section_names.get(&id)) {
                    Some(section) => format!("{class} - {section}"),
                    None => class.clone(),
                };
                Some((e.student_id, label))
            })
            .collect())
    }
}

/// Enrollment context read through any connection, so the payment write path
/// can load it inside its transaction.
pub(crate) async fn load_enrollment_context<C: ConnectionTrait>(
    conn: &C,
    student_id: StudentId,
    academic_year_id: AcademicYearId,
) -> Result<EnrollmentContext, EnrollmentError> {
    let student = students::Entity::find_by_id(student_id.into_inner())
        .one(conn)
        .await?
        .ok_or(EnrollmentError::StudentNotFound(student_id))?;
    academic_years::Entity::find_by_id(academic_year_id.into_inner())
        .one(conn)
        .await?
        .ok_or(EnrollmentError::AcademicYearNotFound(academic_year_id))?;

    let enrollment = student_enrollments::Entity::find()
        .filter(student_enrollments::Column::StudentId.eq(student.id))
        .filter(student_enrollments::Column::AcademicYearId.eq(academic_year_id.into_inner()))
        .one(conn)
        .await?
        .ok_or(EnrollmentError::NotEnrolled {
            student_id,
            academic_year_id,
        })?;

    Ok(EnrollmentContext {
        student_id,
        academic_year_id,
        class_id: enrollment.class_id.into(),
        section_id: enrollment.section_id.map(Into::into),
        stream: student.stream,
        subject_count: student.subject_count,
        is_new_student: student.is_new_student,
    })
}
