use chrono::Local;
use settlemate_domain::{
    BalanceCalculator, ExpenseApplier, ExpenseDraft, PersonId, SettlementPlanner, SplitType,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    model::{BalanceSheet, TransactionRecord},
    ports::LedgerStore,
};

/// Orchestrates one group's expenses over an external store: validate the
/// draft, compute shares, fold into the ledger, persist the new graph, and
/// append the history record.
pub struct ExpenseProcessor<'a, S: LedgerStore> {
    store: &'a S,
    members: Vec<PersonId>,
    applier: ExpenseApplier,
}

impl<'a, S: LedgerStore> ExpenseProcessor<'a, S> {
    pub fn new(store: &'a S, members: Vec<PersonId>) -> Self {
        Self {
            store,
            members,
            applier: ExpenseApplier,
        }
    }

    pub fn members(&self) -> &[PersonId] {
        &self.members
    }

    /// Blank draft for the caller's form, dated today.
    pub fn new_draft(&self, default_payer: Option<&PersonId>) -> Option<ExpenseDraft> {
        self.applier
            .initialize(&self.members, default_payer, Local::now().date_naive())
    }

    /// Runs the full expense flow. On success the store holds the new graph
    /// and the appended record; on validation failure nothing is written and
    /// the caller may retry with corrected input.
    pub fn record_expense(
        &self,
        draft: &ExpenseDraft,
        split_type: SplitType,
    ) -> Result<TransactionRecord, AppError> {
        if let Err(rejection) = self.applier.validate(draft, split_type) {
            tracing::warn!(payer = %draft.payer, %rejection, "expense rejected");
            return Err(rejection.into());
        }

        let shares = self
            .applier
            .calculate_shares(draft, split_type, &self.members);
        let graph = self.store.load_graph()?;
        let next = self.applier.apply(&graph, draft, &shares)?;
        self.store.save_graph(&next)?;

        let record = TransactionRecord {
            id: Uuid::new_v4(),
            payer: draft.payer.clone(),
            purpose: draft.purpose.clone(),
            amount: draft.amount,
            shares,
            split_type,
            date: draft.date,
        };
        self.store.append_record(&record)?;

        tracing::debug!(
            id = %record.id,
            payer = %record.payer,
            amount = %record.amount,
            "expense recorded"
        );
        Ok(record)
    }

    /// Current standing of the group: net balances plus the suggested
    /// payoff plan, as one immutable snapshot.
    pub fn balance_sheet(&self) -> Result<BalanceSheet, AppError> {
        let graph = self.store.load_graph()?;
        Ok(BalanceSheet {
            balances: BalanceCalculator.net_balances(&graph),
            settlements: SettlementPlanner.plan(&graph),
        })
    }

    /// Forgives the debt between one pair off-ledger: the pair's entries are
    /// zeroed and the graph persisted, with no history record.
    pub fn forgive(&self, a: &PersonId, b: &PersonId) -> Result<(), AppError> {
        let graph = self.store.load_graph()?;
        let next = self.applier.clear_debt(&graph, a, b)?;
        self.store.save_graph(&next)?;

        tracing::debug!(%a, %b, "pairwise debt forgiven");
        Ok(())
    }
}
