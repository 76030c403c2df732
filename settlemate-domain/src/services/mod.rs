pub mod balance_calculator;
pub mod expense_applier;
pub mod settlement_planner;

pub use balance_calculator::BalanceCalculator;
pub use expense_applier::ExpenseApplier;
pub use settlement_planner::SettlementPlanner;
