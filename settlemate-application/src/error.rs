use settlemate_domain::{ExpenseValidationError, LedgerError};
use thiserror::Error;

/// Failure reported by an external [`LedgerStore`](crate::ports::LedgerStore)
/// implementation.
#[derive(Debug, Error)]
#[error("store failure: {0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid expense: {0}")]
    Validation(#[from] ExpenseValidationError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
