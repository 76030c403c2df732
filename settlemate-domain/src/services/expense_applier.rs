use chrono::NaiveDate;

use crate::model::{
    DebtGraph, ExpenseDraft, ExpenseValidationError, LedgerError, Money, PersonId, Shares,
    SplitType,
};

/// Validates proposed expenses, computes per-member shares, and folds the
/// result into the ledger.
pub struct ExpenseApplier;

impl ExpenseApplier {
    /// Builds an empty expense skeleton: payer defaults to the supplied one
    /// or the first member, every other member starts with a zero share, and
    /// the date is the caller-supplied current date. Returns `None` when no
    /// payer candidate exists.
    pub fn initialize(
        &self,
        members: &[PersonId],
        default_payer: Option<&PersonId>,
        today: NaiveDate,
    ) -> Option<ExpenseDraft> {
        let payer = default_payer.or(members.first())?.clone();
        let split_among: Shares = members
            .iter()
            .filter(|member| **member != payer)
            .map(|member| (member.clone(), Money::ZERO))
            .collect();

        Some(ExpenseDraft {
            payer,
            purpose: String::new(),
            amount: Money::ZERO,
            split_among,
            date: today,
        })
    }

    /// Computes the per-member shares for the draft.
    ///
    /// Equal splits divide across the full current member list minus the
    /// payer, each participant owing `amount / (participants + 1)`; the `+1`
    /// is the payer's own equal share, which never becomes a ledger edge to
    /// themselves. Custom splits return the caller-supplied shares unchanged;
    /// [`validate`](Self::validate) enforces consistency with the amount.
    pub fn calculate_shares(
        &self,
        draft: &ExpenseDraft,
        split_type: SplitType,
        group_members: &[PersonId],
    ) -> Shares {
        match split_type {
            SplitType::Equal => {
                let participants: Vec<&PersonId> = group_members
                    .iter()
                    .filter(|member| **member != draft.payer)
                    .collect();
                let share = draft.amount.divided_by(participants.len() as i64 + 1);
                participants
                    .into_iter()
                    .map(|member| (member.clone(), share))
                    .collect()
            }
            SplitType::Custom => draft.split_among.clone(),
        }
    }

    /// Checks a draft against the validation rules. Failures are values for
    /// the caller to surface; the caller may correct the input and retry.
    pub fn validate(
        &self,
        draft: &ExpenseDraft,
        split_type: SplitType,
    ) -> Result<(), ExpenseValidationError> {
        if !draft.amount.is_positive() {
            return Err(ExpenseValidationError::InvalidAmount);
        }
        if draft.split_among.is_empty() {
            return Err(ExpenseValidationError::NoDebtors);
        }

        if split_type == SplitType::Custom {
            let total: Money = draft.split_among.values().sum();
            if total > draft.amount + Money::epsilon() {
                return Err(ExpenseValidationError::CustomSplitOverflow {
                    total,
                    amount: draft.amount,
                });
            }
            let payer_contribution = draft.amount - total;
            if payer_contribution < -Money::epsilon() {
                return Err(ExpenseValidationError::NegativePayerContribution {
                    total,
                    shortfall: -payer_contribution,
                });
            }
        }

        Ok(())
    }

    /// Folds an expense into the ledger: for each non-payer share, the
    /// payer's exposure to that member grows by the share and the mirrored
    /// entry shrinks by the same amount, preserving the zero-sum invariant.
    ///
    /// Functional update: the input graph is left untouched and a distinct
    /// new graph is returned, so callers can keep history snapshots.
    pub fn apply(
        &self,
        graph: &DebtGraph,
        draft: &ExpenseDraft,
        shares: &Shares,
    ) -> Result<DebtGraph, LedgerError> {
        graph.ensure_consistent()?;

        let mut next = graph.clone();
        for (member, share) in shares {
            if *member == draft.payer {
                continue;
            }
            next.add_exposure(&draft.payer, member, *share)?;
            next.add_exposure(member, &draft.payer, -*share)?;
        }

        tracing::debug!(
            payer = %draft.payer,
            amount = %draft.amount,
            debtors = shares.len(),
            "expense folded into ledger"
        );
        Ok(next)
    }

    /// Forgives the debt between exactly one pair: both directed entries are
    /// zeroed, unrelated pairs stay untouched, and no transaction record is
    /// produced. Intentionally allowed unilaterally ("we agree this debt is
    /// settled off-ledger").
    pub fn clear_debt(
        &self,
        graph: &DebtGraph,
        a: &PersonId,
        b: &PersonId,
    ) -> Result<DebtGraph, LedgerError> {
        let mut next = graph.clone();
        next.zero_pair(a, b)?;
        Ok(next)
    }
}
