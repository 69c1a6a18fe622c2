//! Validation and row planning for the fee catalog.

use std::cmp::Ordering;

use bursar_shared::types::MONEY_SCALE;
use rust_decimal::Decimal;

use super::calendar::AcademicCalendar;
use super::error::CatalogError;
use super::types::{
    AcademicYear, FeeFrequency, FeeStructure, FeeStructureConfig, NewFeeHead, PlannedStructureRow,
};

/// Fee catalog business rules.
pub struct CatalogService;

impl CatalogService {
    /// Trims and validates a new fee head.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyHeadName` if the trimmed name is empty.
    pub fn normalize_head(input: NewFeeHead) -> Result<NewFeeHead, CatalogError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyHeadName);
        }
        Ok(NewFeeHead {
            name: name.to_string(),
            new_student_only: input.new_student_only,
        })
    }

    /// Trims a stream narrowing; blank values mean "no narrowing".
    #[must_use]
    pub fn normalize_stream(stream: Option<&str>) -> Option<String> {
        stream
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    }

    /// Validates a structure configuration and expands it into stored rows.
    ///
    /// ONE_TIME yields a single row due on the explicit date or 1 April.
    /// MONTHLY yields twelve rows due on the 10th, April through March; an
    /// explicit due date is ignored.
    ///
    /// # Errors
    ///
    /// Returns a validation `CatalogError` for non-positive or over-precise
    /// amounts, non-positive subject counts and due dates outside the year.
    pub fn plan_structure(
        config: &FeeStructureConfig,
        year: &AcademicYear,
    ) -> Result<Vec<PlannedStructureRow>, CatalogError> {
        if config.amount <= Decimal::ZERO {
            return Err(CatalogError::NonPositiveAmount(config.amount));
        }
        if config.amount.normalize().scale() > MONEY_SCALE {
            return Err(CatalogError::TooPrecise(config.amount));
        }
        if let Some(count) = config.subject_count
            && count <= 0
        {
            return Err(CatalogError::InvalidSubjectCount(count));
        }

        let calendar = AcademicCalendar::for_year(year);
        let due_dates = match config.frequency {
            FeeFrequency::OneTime => {
                let due = match config.due_date {
                    Some(date) if !calendar.contains(date) => {
                        return Err(CatalogError::DueDateOutsideYear(date));
                    }
                    Some(date) => date,
                    None => calendar.one_time_due_date()?,
                };
                vec![due]
            }
            FeeFrequency::Monthly => calendar.monthly_due_dates()?,
        };

        let stream = Self::normalize_stream(config.stream.as_deref());
        Ok(due_dates
            .into_iter()
            .map(|due_date| PlannedStructureRow {
                class_id: config.class_id,
                academic_year_id: config.academic_year_id,
                fee_head_id: config.fee_head_id,
                amount: config.amount,
                frequency: config.frequency,
                due_date,
                stream: stream.clone(),
                subject_count: config.subject_count,
            })
            .collect())
    }

    /// Catalog listing order: class, generic rows before narrowed rows, due date.
    pub fn sort_for_listing(structures: &mut [FeeStructure]) {
        structures.sort_by(|a, b| {
            a.class_id
                .cmp(&b.class_id)
                .then_with(|| narrowed_last(a, b))
                .then_with(|| a.due_date.cmp(&b.due_date))
                .then_with(|| a.id.cmp(&b.id))
        });
    }
}

fn narrowed_last(a: &FeeStructure, b: &FeeStructure) -> Ordering {
    a.is_narrowed().cmp(&b.is_narrowed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bursar_shared::types::{AcademicYearId, ClassId, FeeHeadId, FeeStructureId};
    use chrono::{Datelike, NaiveDate};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn year() -> AcademicYear {
        AcademicYear {
            id: AcademicYearId::new(),
            name: "2025-26".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        }
    }

    fn config(frequency: FeeFrequency, amount: rust_decimal::Decimal) -> FeeStructureConfig {
        FeeStructureConfig {
            class_id: ClassId::new(),
            academic_year_id: AcademicYearId::new(),
            fee_head_id: FeeHeadId::new(),
            amount,
            frequency,
            due_date: None,
            stream: None,
            subject_count: None,
        }
    }

    #[test]
    fn test_normalize_head_trims() {
        let head = CatalogService::normalize_head(NewFeeHead {
            name: "  Tuition Fee ".to_string(),
            new_student_only: false,
        })
        .unwrap();
        assert_eq!(head.name, "Tuition Fee");
    }

    #[test]
    fn test_normalize_head_rejects_blank() {
        let result = CatalogService::normalize_head(NewFeeHead {
            name: "   ".to_string(),
            new_student_only: true,
        });
        assert!(matches!(result, Err(CatalogError::EmptyHeadName)));
    }

    #[rstest]
    #[case(Some("Science"), Some("Science"))]
    #[case(Some("  Commerce "), Some("Commerce"))]
    #[case(Some("   "), None)]
    #[case(None, None)]
    fn test_normalize_stream(#[case] input: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(
            CatalogService::normalize_stream(input).as_deref(),
            expected
        );
    }

    #[test]
    fn test_one_time_defaults_to_first_april() {
        let rows =
            CatalogService::plan_structure(&config(FeeFrequency::OneTime, dec!(20000)), &year())
                .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].due_date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert_eq!(rows[0].amount, dec!(20000));
    }

    #[test]
    fn test_one_time_keeps_explicit_due_date() {
        let mut cfg = config(FeeFrequency::OneTime, dec!(1500));
        cfg.due_date = NaiveDate::from_ymd_opt(2025, 7, 15);
        let rows = CatalogService::plan_structure(&cfg, &year()).unwrap();
        assert_eq!(rows[0].due_date, NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());
    }

    #[test]
    fn test_one_time_due_date_outside_year_rejected() {
        let mut cfg = config(FeeFrequency::OneTime, dec!(1500));
        cfg.due_date = NaiveDate::from_ymd_opt(2026, 4, 1);
        let result = CatalogService::plan_structure(&cfg, &year());
        assert!(matches!(result, Err(CatalogError::DueDateOutsideYear(_))));
    }

    #[test]
    fn test_monthly_expands_to_twelve_rows() {
        let mut cfg = config(FeeFrequency::Monthly, dec!(5000));
        cfg.stream = Some(" Science ".to_string());
        cfg.subject_count = Some(5);
        let rows = CatalogService::plan_structure(&cfg, &year()).unwrap();

        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|r| r.amount == dec!(5000)));
        assert!(rows.iter().all(|r| r.stream.as_deref() == Some("Science")));
        assert!(rows.iter().all(|r| r.subject_count == Some(5)));
        assert_eq!(rows[0].due_date, NaiveDate::from_ymd_opt(2025, 4, 10).unwrap());
        assert_eq!(rows[11].due_date, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-100))]
    fn test_non_positive_amount_rejected(#[case] amount: rust_decimal::Decimal) {
        let result = CatalogService::plan_structure(&config(FeeFrequency::Monthly, amount), &year());
        assert!(matches!(result, Err(CatalogError::NonPositiveAmount(_))));
    }

    #[test]
    fn test_over_precise_amount_rejected() {
        let result =
            CatalogService::plan_structure(&config(FeeFrequency::OneTime, dec!(10.005)), &year());
        assert!(matches!(result, Err(CatalogError::TooPrecise(_))));
    }

    #[test]
    fn test_trailing_zeros_are_not_too_precise() {
        let result =
            CatalogService::plan_structure(&config(FeeFrequency::OneTime, dec!(10.5000)), &year());
        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_subject_count_rejected() {
        let mut cfg = config(FeeFrequency::OneTime, dec!(100));
        cfg.subject_count = Some(0);
        let result = CatalogService::plan_structure(&cfg, &year());
        assert!(matches!(result, Err(CatalogError::InvalidSubjectCount(0))));
    }

    #[test]
    fn test_sort_for_listing_puts_generic_first() {
        let class_id = ClassId::new();
        let make = |stream: Option<&str>, month: u32| FeeStructure {
            id: FeeStructureId::new(),
            class_id,
            academic_year_id: AcademicYearId::new(),
            fee_head_id: FeeHeadId::new(),
            amount: dec!(100),
            frequency: FeeFrequency::Monthly,
            due_date: NaiveDate::from_ymd_opt(2025, month, 10).unwrap(),
            stream: stream.map(ToString::to_string),
            subject_count: None,
        };
        let mut rows = vec![make(Some("Science"), 4), make(None, 5), make(None, 4)];
        CatalogService::sort_for_listing(&mut rows);

        assert!(rows[0].stream.is_none());
        assert_eq!(rows[0].due_date.month(), 4);
        assert!(rows[1].stream.is_none());
        assert_eq!(rows[2].stream.as_deref(), Some("Science"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CatalogError::EmptyHeadName.http_status_code(), 400);
        assert_eq!(CatalogError::AlreadyConfigured.error_code(), "CONFLICT");
        assert_eq!(CatalogError::AlreadyConfigured.http_status_code(), 409);
        assert_eq!(
            CatalogError::HeadNotFound(FeeHeadId::new()).http_status_code(),
            404
        );
    }
}
