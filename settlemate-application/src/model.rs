use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use settlemate_domain::{Money, NetBalances, PersonId, Settlement, Shares, SplitType};
use uuid::Uuid;

use crate::ports::MemberDirectory;

/// Completed-expense record handed to the external append-only history.
/// Serializable as-is; the store decides the medium.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub payer: PersonId,
    pub purpose: String,
    pub amount: Money,
    pub shares: Shares,
    pub split_type: SplitType,
    pub date: NaiveDate,
}

/// One immutable snapshot of the group's standing: net balances plus the
/// suggested payoff plan. The presentation layer holds only the latest
/// snapshot and re-renders on replacement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BalanceSheet {
    pub balances: NetBalances,
    pub settlements: Vec<Settlement>,
}

impl BalanceSheet {
    /// Renders the suggested payments as display lines, resolving names
    /// through the member directory. Unknown members fall back to their raw
    /// identifier.
    pub fn settlement_lines(&self, directory: &impl MemberDirectory) -> Vec<String> {
        self.settlements
            .iter()
            .map(|settlement| {
                let from = directory
                    .display_name(&settlement.from)
                    .unwrap_or(settlement.from.as_str());
                let to = directory
                    .display_name(&settlement.to)
                    .unwrap_or(settlement.to.as_str());
                format!("{from} pays {to} {}", settlement.amount)
            })
            .collect()
    }
}
