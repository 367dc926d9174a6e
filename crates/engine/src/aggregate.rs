//! Totals over expense records.
//!
//! Totals are always recomputed from the records a store returns; nothing is
//! cached between calls.
use crate::{EngineError, Expense, Money, ResultEngine};

/// Sums the amounts of `expenses` in fixed-point arithmetic.
///
/// An empty input sums to [`Money::ZERO`].
pub fn total<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> ResultEngine<Money> {
    expenses.into_iter().try_fold(Money::ZERO, |acc, expense| {
        acc.checked_add(expense.amount).ok_or(EngineError::Overflow)
    })
}
