//! Persistence seam for expense records.
//!
//! The engine never talks to a database directly: every read and write goes
//! through [`ExpenseStore`]. Each call is expected to be atomic on its own;
//! nothing spans more than one call, so there is nothing to roll back.
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{Expense, ResultEngine};

pub use memory::MemoryStore;
pub use sql::SqlStore;

mod memory;
mod sql;

/// Conjunction over user and (optionally) day.
///
/// The user is mandatory so a filter can never select other users' records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub user_id: String,
    pub date: Option<NaiveDate>,
}

impl ExpenseFilter {
    /// Every record of a user.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            date: None,
        }
    }

    /// Records of a user on a single day.
    pub fn day(user_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            date: Some(date),
        }
    }

    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        expense.user_id == self.user_id && self.date.is_none_or(|date| expense.date == date)
    }
}

/// Durable collection of expense records.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Persists a new record.
    async fn create(&self, expense: &Expense) -> ResultEngine<()>;

    /// Returns the matching records in insertion order.
    async fn find(&self, filter: &ExpenseFilter) -> ResultEngine<Vec<Expense>>;

    /// Deletes the matching records and returns how many were removed.
    async fn delete_many(&self, filter: &ExpenseFilter) -> ResultEngine<u64>;
}
