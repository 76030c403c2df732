use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use arcstr::ArcStr;
use chrono::NaiveDate;
use fxhash::FxHashSet;
use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque member identifier, unique within a group.
///
/// Ordering is lexicographic over the identifier text and is used only for
/// deterministic tie-breaking, never for ledger semantics.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(ArcStr);

impl PersonId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(ArcStr::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Fixed-decimal monetary amount.
///
/// Amounts within [`Money::epsilon`] of zero are treated as settled.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(mantissa: i64, scale: u32) -> Self {
        Self(Decimal::new(mantissa, scale))
    }

    /// Threshold below which a difference is treated as settled (0.01).
    pub fn epsilon() -> Self {
        Self(Decimal::new(1, 2))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Whether the amount lies within the settled tolerance of zero.
    pub fn is_settled(self) -> bool {
        self.abs() <= Self::epsilon()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Rounds to two decimal places, half away from zero.
    pub fn round2(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    pub fn divided_by(self, divisor: i64) -> Self {
        Self(self.0 / Decimal::from(divisor))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|money| money.0).sum())
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        Self(iter.map(|money| money.0).sum())
    }
}

/// Per-member share assignment for one expense.
pub type Shares = IndexMap<PersonId, Money>;

/// Net claim (positive) or obligation (negative) per member.
pub type NetBalances = IndexMap<PersonId, Money>;

/// How an expense amount is divided among the group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Equal,
    Custom,
}

/// An in-progress expense, as edited by the caller before validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub payer: PersonId,
    pub purpose: String,
    pub amount: Money,
    pub split_among: Shares,
    pub date: NaiveDate,
}

/// A recommended payment that reduces outstanding balances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: PersonId,
    pub to: PersonId,
    pub amount: Money,
}

/// Precondition violation signalled when a graph fails its structural
/// invariants. Never repaired silently; the upstream caller has a bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid ledger state: {detail}")]
    InvalidLedgerState { detail: String },
}

impl LedgerError {
    pub(crate) fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidLedgerState {
            detail: detail.into(),
        }
    }
}

/// Recoverable rejection of a proposed expense. The caller may correct the
/// input and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseValidationError {
    #[error("amount must be a positive value")]
    InvalidAmount,
    #[error("at least one person besides the payer must owe a share")]
    NoDebtors,
    #[error("custom shares total {total} exceeds the expense amount {amount}")]
    CustomSplitOverflow { total: Money, amount: Money },
    #[error("custom shares total {total} would leave the payer owed {shortfall} back")]
    NegativePayerContribution { total: Money, shortfall: Money },
}

/// Signed, antisymmetric pairwise-balance structure over group members.
///
/// `entry(a, b)` is a's net exposure to b: positive means b owes a.
/// Invariant: `entry(a, b) == -entry(b, a)` for every distinct pair, and no
/// diagonal entries exist. All mutation is functional; operations clone the
/// graph structurally and return a new value, so callers can keep history
/// snapshots without aliasing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtGraph {
    rows: IndexMap<PersonId, IndexMap<PersonId, Money>>,
}

impl DebtGraph {
    /// Builds an all-zero graph for the given member set. Duplicate
    /// identifiers are ignored; member order is preserved for display.
    pub fn for_members<I>(members: I) -> Self
    where
        I: IntoIterator<Item = PersonId>,
    {
        let mut seen = FxHashSet::default();
        let members: Vec<PersonId> = members
            .into_iter()
            .filter(|member| seen.insert(member.clone()))
            .collect();

        let rows = members
            .iter()
            .map(|member| {
                let row: IndexMap<PersonId, Money> = members
                    .iter()
                    .filter(|other| *other != member)
                    .map(|other| (other.clone(), Money::ZERO))
                    .collect();
                (member.clone(), row)
            })
            .collect();

        Self { rows }
    }

    pub fn members(&self) -> impl Iterator<Item = &PersonId> {
        self.rows.keys()
    }

    pub fn member_count(&self) -> usize {
        self.rows.len()
    }

    pub fn contains(&self, member: &PersonId) -> bool {
        self.rows.contains_key(member)
    }

    /// The signed exposure of `a` to `b`, if both directions are present.
    pub fn entry(&self, a: &PersonId, b: &PersonId) -> Option<Money> {
        self.rows.get(a).and_then(|row| row.get(b)).copied()
    }

    pub fn row(&self, member: &PersonId) -> Option<&IndexMap<PersonId, Money>> {
        self.rows.get(member)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&PersonId, &IndexMap<PersonId, Money>)> {
        self.rows.iter()
    }

    /// Checks the structural invariants: no diagonal entries, every entry
    /// mirrored by its counterparty, and antisymmetry within epsilon.
    ///
    /// Violations are upstream programmer errors, so this fails instead of
    /// repairing the graph.
    pub fn ensure_consistent(&self) -> Result<(), LedgerError> {
        for (person, row) in &self.rows {
            if row.contains_key(person) {
                return Err(LedgerError::invalid(format!(
                    "self-referential entry for {person}"
                )));
            }
            for (other, amount) in row {
                let Some(mirrored) = self.rows.get(other).and_then(|r| r.get(person)) else {
                    return Err(LedgerError::invalid(format!(
                        "missing counterparty entry {other} -> {person}"
                    )));
                };
                if !(*amount + *mirrored).is_settled() {
                    return Err(LedgerError::invalid(format!(
                        "asymmetric pair {person} / {other}: {amount} vs {mirrored}"
                    )));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn add_exposure(
        &mut self,
        from: &PersonId,
        to: &PersonId,
        amount: Money,
    ) -> Result<(), LedgerError> {
        let entry = self
            .rows
            .get_mut(from)
            .and_then(|row| row.get_mut(to))
            .ok_or_else(|| LedgerError::invalid(format!("missing entry {from} -> {to}")))?;
        *entry += amount;
        Ok(())
    }

    pub(crate) fn zero_pair(&mut self, a: &PersonId, b: &PersonId) -> Result<(), LedgerError> {
        for (from, to) in [(a, b), (b, a)] {
            let entry = self
                .rows
                .get_mut(from)
                .and_then(|row| row.get_mut(to))
                .ok_or_else(|| LedgerError::invalid(format!("missing entry {from} -> {to}")))?;
            *entry = Money::ZERO;
        }
        Ok(())
    }
}
