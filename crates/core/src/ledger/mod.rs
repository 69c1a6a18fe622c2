//! Per-student fee ledger.
//!
//! - `resolver` selects the fee structures that apply to an enrolled student
//! - `builder` joins the resulting obligations with recorded allocations

pub mod builder;
pub mod resolver;
pub mod types;

#[cfg(test)]
mod builder_props;

pub use builder::{LedgerBuilder, derive_status};
pub use resolver::FeeStructureResolver;
pub use types::{
    AllocationRecord, EnrollmentContext, HeadGroup, LedgerLine, LedgerStatus, LedgerSummary,
    ObligationInstance, StatusCounts, StudentLedger,
};
