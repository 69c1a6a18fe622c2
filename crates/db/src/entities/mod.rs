//! `SeaORM` entity definitions.

pub mod academic_years;
pub mod classes;
pub mod fee_heads;
pub mod fee_structures;
pub mod payment_allocations;
pub mod payment_events;
pub mod sea_orm_active_enums;
pub mod sections;
pub mod student_enrollments;
pub mod students;
pub mod users;
