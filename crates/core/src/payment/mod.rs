//! Payment collection: validation, allocation and receipts.
//!
//! Allocation here is pure. Persisting a plan, including the locking and
//! fresh-balance re-check, is done by the database layer.

pub mod allocator;
pub mod error;
pub mod receipt;
pub mod types;

#[cfg(test)]
mod allocator_props;

pub use allocator::PaymentAllocator;
pub use error::PaymentError;
pub use receipt::{RECEIPT_PREFIX, RECEIPT_SUFFIX_MAX, RECEIPT_SUFFIX_MIN, is_receipt_number, receipt_number};
pub use types::{
    AllocationPlan, CollectPaymentInput, PaymentMode, PaymentOutcome, PlannedAllocation,
    RecordedAllocation, SelectedItem,
};
