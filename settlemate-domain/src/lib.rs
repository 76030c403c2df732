#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    DebtGraph, ExpenseDraft, ExpenseValidationError, LedgerError, Money, NetBalances, PersonId,
    Settlement, Shares, SplitType,
};
pub use services::{BalanceCalculator, ExpenseApplier, SettlementPlanner};
