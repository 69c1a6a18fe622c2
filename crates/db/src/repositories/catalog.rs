//! Fee catalog repository: fee heads and fee structures.

use bursar_core::catalog::{
    AcademicYear, CatalogError, CatalogService, FeeHead, FeeStructure, FeeStructureConfig,
    NewFeeHead,
};
use bursar_shared::types::{AcademicYearId, ClassId};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{academic_years, classes, fee_heads, fee_structures};

/// Errors from catalog persistence.
#[derive(Debug, thiserror::Error)]
pub enum CatalogRepoError {
    /// Catalog rule violated.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Catalog repository.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

impl CatalogRepository {
    /// Creates a new catalog repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a fee head.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyHeadName` for a blank name and
    /// `CatalogError::DuplicateHeadName` if the name is taken.
    pub async fn create_head(&self, input: NewFeeHead) -> Result<FeeHead, CatalogRepoError> {
        let input = CatalogService::normalize_head(input)?;

        let existing = fee_heads::Entity::find()
            .filter(fee_heads::Column::Name.eq(input.name.as_str()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CatalogError::DuplicateHeadName(input.name).into());
        }

        let model = fee_heads::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name.clone()),
            new_student_only: Set(input.new_student_only),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                CatalogRepoError::Catalog(CatalogError::DuplicateHeadName(input.name.clone()))
            }
            _ => CatalogRepoError::Database(e),
        })?;

        tracing::info!(fee_head_id = %model.id, name = %model.name, "Fee head created");
        Ok(model.into())
    }

    /// Lists fee heads ordered by name.
    pub async fn list_heads(&self) -> Result<Vec<FeeHead>, DbErr> {
        let heads = fee_heads::Entity::find()
            .order_by_asc(fee_heads::Column::Name)
            .all(&self.db)
            .await?;
        Ok(heads.into_iter().map(Into::into).collect())
    }

    /// Validates a configuration and stores its rows in one transaction.
    ///
    /// # Errors
    ///
    /// Returns not-found errors for an unknown class, year or head, catalog
    /// validation errors, and `CatalogError::AlreadyConfigured` if the same
    /// class, year, head and narrowing is already configured.
    pub async fn configure_structure(
        &self,
        config: FeeStructureConfig,
    ) -> Result<Vec<FeeStructure>, CatalogRepoError> {
        let year: AcademicYear = academic_years::Entity::find_by_id(config.academic_year_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CatalogError::AcademicYearNotFound(config.academic_year_id))?
            .into();
        classes::Entity::find_by_id(config.class_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CatalogError::ClassNotFound(config.class_id))?;
        fee_heads::Entity::find_by_id(config.fee_head_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CatalogError::HeadNotFound(config.fee_head_id))?;

        let rows = CatalogService::plan_structure(&config, &year)?;
        let stream = CatalogService::normalize_stream(config.stream.as_deref());

        let txn = self.db.begin().await?;

        let mut existing = fee_structures::Entity::find()
            .filter(fee_structures::Column::ClassId.eq(config.class_id.into_inner()))
            .filter(fee_structures::Column::AcademicYearId.eq(config.academic_year_id.into_inner()))
            .filter(fee_structures::Column::FeeHeadId.eq(config.fee_head_id.into_inner()));
        existing = match &stream {
            Some(s) => existing.filter(fee_structures::Column::Stream.eq(s.as_str())),
            None => existing.filter(fee_structures::Column::Stream.is_null()),
        };
        existing = match config.subject_count {
            Some(n) => existing.filter(fee_structures::Column::SubjectCount.eq(n)),
            None => existing.filter(fee_structures::Column::SubjectCount.is_null()),
        };
        if existing.one(&txn).await?.is_some() {
            return Err(CatalogError::AlreadyConfigured.into());
        }

        let now = Utc::now();
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let model = fee_structures::ActiveModel {
                id: Set(Uuid::now_v7()),
                class_id: Set(row.class_id.into_inner()),
                academic_year_id: Set(row.academic_year_id.into_inner()),
                fee_head_id: Set(row.fee_head_id.into_inner()),
                amount: Set(row.amount),
                frequency: Set(row.frequency.into()),
                due_date: Set(row.due_date),
                stream: Set(row.stream),
                subject_count: Set(row.subject_count),
                created_at: Set(now.into()),
            }
            .insert(&txn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    CatalogRepoError::Catalog(CatalogError::AlreadyConfigured)
                }
                _ => CatalogRepoError::Database(e),
            })?;
            stored.push(FeeStructure::from(model));
        }

        txn.commit().await?;

        tracing::info!(
            class_id = %config.class_id,
            academic_year_id = %config.academic_year_id,
            fee_head_id = %config.fee_head_id,
            frequency = %config.frequency,
            rows = stored.len(),
            "Fee structure configured"
        );
        Ok(stored)
    }

    /// Lists structures, optionally for one class and/or year.
    pub async fn list_structures(
        &self,
        class_id: Option<ClassId>,
        academic_year_id: Option<AcademicYearId>,
    ) -> Result<Vec<FeeStructure>, DbErr> {
        let mut query = fee_structures::Entity::find();
        if let Some(class_id) = class_id {
            query = query.filter(fee_structures::Column::ClassId.eq(class_id.into_inner()));
        }
        if let Some(year_id) = academic_year_id {
            query = query.filter(fee_structures::Column::AcademicYearId.eq(year_id.into_inner()));
        }

        let mut structures: Vec<FeeStructure> =
            query.all(&self.db).await?.into_iter().map(Into::into).collect();
        CatalogService::sort_for_listing(&mut structures);
        Ok(structures)
    }

    /// Structures of a class and year paired with their heads.
    pub async fn candidates_for(
        &self,
        class_id: ClassId,
        academic_year_id: AcademicYearId,
    ) -> Result<Vec<(FeeStructure, FeeHead)>, DbErr> {
        load_candidates(&self.db, class_id, academic_year_id).await
    }
}

pub(crate) async fn load_candidates<C: ConnectionTrait>(
    conn: &C,
    class_id: ClassId,
    academic_year_id: AcademicYearId,
) -> Result<Vec<(FeeStructure, FeeHead)>, DbErr> {
    let rows = fee_structures::Entity::find()
        .filter(fee_structures::Column::ClassId.eq(class_id.into_inner()))
        .filter(fee_structures::Column::AcademicYearId.eq(academic_year_id.into_inner()))
        .find_also_related(fee_heads::Entity)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(structure, head)| Some((structure.into(), head?.into())))
        .collect())
}
