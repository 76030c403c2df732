#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod ports;
pub mod processor;

pub use error::{AppError, StoreError};
pub use model::{BalanceSheet, TransactionRecord};
pub use ports::{LedgerStore, MemberDirectory};
pub use processor::ExpenseProcessor;
