//! Catalog domain types.

use bursar_shared::types::{AcademicYearId, ClassId, FeeHeadId, FeeStructureId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How often a fee head is charged within an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeFrequency {
    /// Charged once per academic year.
    OneTime,
    /// Charged for each of the twelve months of the academic year.
    Monthly,
}

impl FeeFrequency {
    /// Stable code used in storage and APIs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneTime => "ONE_TIME",
            Self::Monthly => "MONTHLY",
        }
    }
}

impl std::fmt::Display for FeeFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeeFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ONE_TIME" | "ONETIME" => Ok(Self::OneTime),
            "MONTHLY" => Ok(Self::Monthly),
            _ => Err(format!("Unknown fee frequency: {s}")),
        }
    }
}

/// A named obligation category, e.g. "Tuition Fee".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeHead {
    /// Unique identifier.
    pub id: FeeHeadId,
    /// Display name, unique across the school.
    pub name: String,
    /// Charged only to students admitted this year.
    pub new_student_only: bool,
}

/// One priced obligation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeStructure {
    /// Unique identifier; the unit a payment allocates against.
    pub id: FeeStructureId,
    /// Class the fee applies to.
    pub class_id: ClassId,
    /// Academic year the fee applies to.
    pub academic_year_id: AcademicYearId,
    /// Fee head.
    pub fee_head_id: FeeHeadId,
    /// Amount owed for this row.
    pub amount: Decimal,
    /// Frequency of the owning configuration.
    pub frequency: FeeFrequency,
    /// Due date of this row.
    pub due_date: NaiveDate,
    /// When set, only students in this stream are charged.
    pub stream: Option<String>,
    /// When set, only students taking this many subjects are charged.
    pub subject_count: Option<i32>,
}

/// Academic year metadata consumed from the administration subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYear {
    /// Unique identifier.
    pub id: AcademicYearId,
    /// Display name, e.g. "2025-26".
    pub name: String,
    /// First day of the academic year.
    pub start_date: NaiveDate,
}

/// Input for creating a fee head.
#[derive(Debug, Clone)]
pub struct NewFeeHead {
    /// Display name.
    pub name: String,
    /// Charged only to new admissions.
    pub new_student_only: bool,
}

/// Input for configuring a fee head's price for a class and year.
#[derive(Debug, Clone)]
pub struct FeeStructureConfig {
    /// Class the fee applies to.
    pub class_id: ClassId,
    /// Academic year the fee applies to.
    pub academic_year_id: AcademicYearId,
    /// Fee head.
    pub fee_head_id: FeeHeadId,
    /// Amount per row (per month for monthly fees).
    pub amount: Decimal,
    /// One-time or monthly.
    pub frequency: FeeFrequency,
    /// Explicit due date for one-time fees.
    pub due_date: Option<NaiveDate>,
    /// Optional stream narrowing.
    pub stream: Option<String>,
    /// Optional subject-count narrowing.
    pub subject_count: Option<i32>,
}

/// One validated row ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStructureRow {
    /// Class the fee applies to.
    pub class_id: ClassId,
    /// Academic year the fee applies to.
    pub academic_year_id: AcademicYearId,
    /// Fee head.
    pub fee_head_id: FeeHeadId,
    /// Amount owed for this row.
    pub amount: Decimal,
    /// Frequency of the configuration.
    pub frequency: FeeFrequency,
    /// Due date of this row.
    pub due_date: NaiveDate,
    /// Normalised stream narrowing.
    pub stream: Option<String>,
    /// Subject-count narrowing.
    pub subject_count: Option<i32>,
}

impl FeeStructure {
    /// Returns true when the row carries a stream or subject-count condition.
    #[must_use]
    pub fn is_narrowed(&self) -> bool {
        self.stream.is_some() || self.subject_count.is_some()
    }
}
