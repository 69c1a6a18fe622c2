//! Payment error types.

use bursar_shared::types::FeeStructureId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned by the payment collection path.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Amount is non-positive, over-precise or exceeds the selected balances.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// No obligations were selected.
    #[error("No fee items selected")]
    NoItemsSelected,

    /// The same obligation was selected more than once.
    #[error("Fee item selected more than once: {0}")]
    DuplicateItem(FeeStructureId),

    /// A selected obligation is not among the student's obligations for the
    /// requested academic year.
    #[error("Unknown fee item: {0}")]
    UnknownObligation(FeeStructureId),

    /// The balance changed since the caller read it.
    #[error("Balance for {fee_structure_id} changed: expected {expected}, now {actual}")]
    StaleBalance {
        /// Obligation whose balance moved.
        fee_structure_id: FeeStructureId,
        /// Balance the caller submitted.
        expected: Decimal,
        /// Balance read inside the transaction.
        actual: Decimal,
    },

    /// The write did not complete; nothing was recorded.
    #[error("Payment could not be recorded: {0}")]
    PersistenceFailure(String),
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::NoItemsSelected => "NO_ITEMS_SELECTED",
            Self::DuplicateItem(_) => "DUPLICATE_ITEM",
            Self::UnknownObligation(_) => "UNKNOWN_OBLIGATION",
            Self::StaleBalance { .. } => "STALE_BALANCE",
            Self::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount(_) | Self::NoItemsSelected | Self::DuplicateItem(_) => 400,
            Self::UnknownObligation(_) => 404,
            Self::StaleBalance { .. } => 409,
            Self::PersistenceFailure(_) => 503,
        }
    }

    /// Only persistence failures may be retried unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::PersistenceFailure(_))
    }
}
