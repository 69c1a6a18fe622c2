//! Repository implementations for data access.

pub mod catalog;
pub mod collection;
pub mod enrollment;
pub mod history;
pub mod ledger;
pub mod payment;

pub use catalog::{CatalogRepoError, CatalogRepository};
pub use collection::CollectionRepository;
pub use enrollment::{EnrollmentError, EnrollmentRepository};
pub use ledger::{LedgerRepository, ReceiptView};
pub use payment::PaymentRepository;
