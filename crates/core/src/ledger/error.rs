//! Error types for ledger operations.

use thiserror::Error;

use super::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The submitted amount is missing, unparsable, or not positive.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// The backing store rejected a read or write. For recording
    /// operations the in-memory mutation has already been applied and
    /// is carried forward to the next successful save.
    #[error(transparent)]
    Store(#[from] StoreError),
}
