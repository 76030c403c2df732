use crate::model::{DebtGraph, NetBalances};

/// Reduces the pairwise ledger to one net figure per member.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Sums each member's row of signed exposures.
    ///
    /// Pure and O(n²). For any graph satisfying the antisymmetry invariant
    /// the result sums to zero within epsilon. An invalid graph is never
    /// repaired here; whatever incorrect total it produces is surfaced so
    /// the upstream bug stays visible.
    pub fn net_balances(&self, graph: &DebtGraph) -> NetBalances {
        graph
            .rows()
            .map(|(person, row)| (person.clone(), row.values().sum()))
            .collect()
    }
}
