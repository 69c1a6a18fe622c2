//! Fee structure resolution.
//!
//! A structure row applies to a student when it belongs to the student's
//! class and academic year, its stream and subject-count conditions are
//! either unset or match the student, and its head is not restricted to new
//! admissions (or the student is one). Streams compare exactly after
//! trimming, the same key the catalog's unique index uses. Generic and
//! narrowed rows for the same head are both emitted; overlap is prevented by
//! the catalog's unique index, not here.

use crate::catalog::{FeeFrequency, FeeHead, FeeStructure, month_label};

use super::types::{EnrollmentContext, ObligationInstance};

/// Selects applicable fee structures for a student.
pub struct FeeStructureResolver;

impl FeeStructureResolver {
    /// Returns true if `structure` (of `head`) applies to the enrolled student.
    #[must_use]
    pub fn applies(ctx: &EnrollmentContext, structure: &FeeStructure, head: &FeeHead) -> bool {
        if structure.class_id != ctx.class_id || structure.academic_year_id != ctx.academic_year_id {
            return false;
        }
        if head.new_student_only && !ctx.is_new_student {
            return false;
        }
        let stream_ok = match (&structure.stream, &ctx.stream) {
            (None, _) => true,
            (Some(required), Some(actual)) => required.trim() == actual.trim(),
            (Some(_), None) => false,
        };
        let subjects_ok = match structure.subject_count {
            None => true,
            Some(required) => ctx.subject_count == Some(required),
        };
        stream_ok && subjects_ok
    }

    /// Emits one obligation per applicable structure row, ordered by head
    /// name, due date, then structure id.
    #[must_use]
    pub fn resolve(
        ctx: &EnrollmentContext,
        candidates: &[(FeeStructure, FeeHead)],
    ) -> Vec<ObligationInstance> {
        let mut instances: Vec<ObligationInstance> = candidates
            .iter()
            .filter(|(structure, head)| {
                structure.fee_head_id == head.id && Self::applies(ctx, structure, head)
            })
            .map(|(structure, head)| ObligationInstance {
                student_id: ctx.student_id,
                fee_structure_id: structure.id,
                fee_head_id: head.id,
                head_name: head.name.clone(),
                frequency: structure.frequency,
                amount: structure.amount,
                due_date: structure.due_date,
                month_label: (structure.frequency == FeeFrequency::Monthly)
                    .then(|| month_label(structure.due_date)),
            })
            .collect();

        instances.sort_by(|a, b| {
            a.head_name
                .cmp(&b.head_name)
                .then_with(|| a.due_date.cmp(&b.due_date))
                .then_with(|| a.fee_structure_id.cmp(&b.fee_structure_id))
        });
        instances
    }
}
