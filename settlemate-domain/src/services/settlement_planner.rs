use crate::{
    model::{DebtGraph, Money, PersonId, Settlement},
    services::BalanceCalculator,
};

/// Greedy two-pointer reduction of net balances into settling payments.
///
/// Near-minimal, not proof-minimal: true minimum-transaction reduction is a
/// hard combinatorial problem and is deliberately not attempted.
pub struct SettlementPlanner;

struct Party {
    person: PersonId,
    remaining: Money,
}

impl SettlementPlanner {
    /// Produces an ordered list of payments that drives every claim and
    /// obligation to within epsilon of zero, provided the input graph
    /// satisfies the zero-sum invariant.
    ///
    /// Deterministic: equal magnitudes are ordered by identifier ascending,
    /// so repeated calls on an unmodified graph return identical output.
    /// Emits at most `creditors + debtors - 1` settlements.
    pub fn plan(&self, graph: &DebtGraph) -> Vec<Settlement> {
        let balances = BalanceCalculator.net_balances(graph);
        let epsilon = Money::epsilon();

        let mut creditors: Vec<Party> = balances
            .iter()
            .filter(|(_, balance)| **balance > epsilon)
            .map(|(person, balance)| Party {
                person: person.clone(),
                remaining: *balance,
            })
            .collect();
        let mut debtors: Vec<Party> = balances
            .iter()
            .filter(|(_, balance)| **balance < -epsilon)
            .map(|(person, balance)| Party {
                person: person.clone(),
                remaining: -*balance,
            })
            .collect();

        // Magnitude descending, identifier ascending on ties.
        let by_magnitude = |a: &Party, b: &Party| {
            b.remaining
                .cmp(&a.remaining)
                .then_with(|| a.person.cmp(&b.person))
        };
        creditors.sort_by(by_magnitude);
        debtors.sort_by(by_magnitude);

        let mut settlements = Vec::with_capacity(creditors.len() + debtors.len());
        let mut i = 0;
        let mut j = 0;
        while i < creditors.len() && j < debtors.len() {
            let settled = creditors[i].remaining.min(debtors[j].remaining);

            if settled > epsilon {
                settlements.push(Settlement {
                    from: debtors[j].person.clone(),
                    to: creditors[i].person.clone(),
                    amount: settled.round2(),
                });
            }

            creditors[i].remaining -= settled;
            debtors[j].remaining -= settled;

            if creditors[i].remaining < epsilon {
                i += 1;
            }
            if debtors[j].remaining < epsilon {
                j += 1;
            }
        }

        tracing::debug!(
            creditors = creditors.len(),
            debtors = debtors.len(),
            settlements = settlements.len(),
            "settlement plan computed"
        );

        settlements
    }
}
