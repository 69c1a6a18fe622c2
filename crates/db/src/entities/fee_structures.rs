//! `SeaORM` Entity for fee_structures table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::FeeFrequency;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_structures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub class_id: Uuid,
    pub academic_year_id: Uuid,
    pub fee_head_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub frequency: FeeFrequency,
    pub due_date: Date,
    pub stream: Option<String>,
    pub subject_count: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Classes,
    #[sea_orm(
        belongs_to = "super::academic_years::Entity",
        from = "Column::AcademicYearId",
        to = "super::academic_years::Column::Id"
    )]
    AcademicYears,
    #[sea_orm(
        belongs_to = "super::fee_heads::Entity",
        from = "Column::FeeHeadId",
        to = "super::fee_heads::Column::Id"
    )]
    FeeHeads,
    #[sea_orm(has_many = "super::payment_allocations::Entity")]
    PaymentAllocations,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

impl Related<super::academic_years::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicYears.def()
    }
}

impl Related<super::fee_heads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeHeads.def()
    }
}

impl Related<super::payment_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for bursar_core::catalog::FeeStructure {
    fn from(model: Model) -> Self {
        Self {
            id: model.id.into(),
            class_id: model.class_id.into(),
            academic_year_id: model.academic_year_id.into(),
            fee_head_id: model.fee_head_id.into(),
            amount: model.amount,
            frequency: model.frequency.into(),
            due_date: model.due_date,
            stream: model.stream,
            subject_count: model.subject_count,
        }
    }
}
