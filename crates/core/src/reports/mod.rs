//! Collection reporting.
//!
//! Read-only views over persisted payment events:
//! - Collections by payment mode, local hour, class and day
//! - Daily collection report
//! - Student balance statement and receipt-grouped payment history

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::CollectionAggregator;
pub use types::*;
