//! Expense engine.
//!
//! Owns the record invariants, the day bucketing in the reference timezone
//! and the totals. Storage is reached only through [`ExpenseStore`].
use std::{fmt, sync::Arc};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use sea_orm::DatabaseConnection;

pub use aggregate::total;
pub use currency::Currency;
pub use error::EngineError;
pub use expenses::{DAY_KEY_FORMAT, Expense, day_key};
pub use money::Money;
pub use store::{ExpenseFilter, ExpenseStore, MemoryStore, SqlStore};

mod aggregate;
mod currency;
mod error;
pub mod expenses;
mod money;
mod store;

type ResultEngine<T> = Result<T, EngineError>;

/// Source of the current instant. Swapped for a fixed one in tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Reference timezone used to decide which calendar day "today" is.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Phnom_Penh;

#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn ExpenseStore>,
    timezone: Tz,
    clock: Clock,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Current instant in the reference timezone.
    pub fn now(&self) -> DateTime<Tz> {
        (self.clock)().with_timezone(&self.timezone)
    }

    /// Calendar day of [`Engine::now`].
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Records a new expense dated today.
    ///
    /// The category is stored as given (trimmed); normalizing its case is the
    /// caller's business.
    pub async fn add_expense(
        &self,
        user_id: &str,
        amount: Money,
        category: &str,
    ) -> ResultEngine<Expense> {
        let expense = Expense::new(user_id, self.today(), amount, category)?;
        self.store.create(&expense).await?;
        Ok(expense)
    }

    /// Records of `user_id` on `day`, in insertion order.
    pub async fn expenses_for_day(
        &self,
        user_id: &str,
        day: NaiveDate,
    ) -> ResultEngine<Vec<Expense>> {
        self.store.find(&ExpenseFilter::day(user_id, day)).await
    }

    /// Sum of the amounts of `user_id` on `day`. Zero when there is nothing.
    pub async fn total_for_day(&self, user_id: &str, day: NaiveDate) -> ResultEngine<Money> {
        let expenses = self.expenses_for_day(user_id, day).await?;
        total(&expenses)
    }

    /// Sum of every amount `user_id` ever recorded.
    pub async fn total_for_user(&self, user_id: &str) -> ResultEngine<Money> {
        let expenses = self.store.find(&ExpenseFilter::user(user_id)).await?;
        total(&expenses)
    }

    /// Deletes the records of `user_id` on `day` and returns how many were
    /// removed.
    pub async fn clear_day(&self, user_id: &str, day: NaiveDate) -> ResultEngine<u64> {
        let removed = self
            .store
            .delete_many(&ExpenseFilter::day(user_id, day))
            .await?;
        tracing::debug!("cleared {removed} expenses of user {user_id} on {day}");
        Ok(removed)
    }
}

fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn ExpenseStore>>,
    timezone: Option<Tz>,
    clock: Option<Clock>,
}

impl EngineBuilder {
    /// Pass the database holding the `expenses` table.
    pub fn database(self, db: DatabaseConnection) -> EngineBuilder {
        self.store(SqlStore::new(db))
    }

    /// Pass any other store implementation.
    pub fn store(mut self, store: impl ExpenseStore + 'static) -> EngineBuilder {
        self.store = Some(Arc::new(store));
        self
    }

    pub fn timezone(mut self, timezone: Tz) -> EngineBuilder {
        self.timezone = Some(timezone);
        self
    }

    pub fn clock(
        mut self,
        clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
    ) -> EngineBuilder {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let store = self.store.ok_or(EngineError::MissingStore)?;
        Ok(Engine {
            store,
            timezone: self.timezone.unwrap_or(DEFAULT_TIMEZONE),
            clock: self.clock.unwrap_or_else(system_clock),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn build_without_store_fails() {
        assert_eq!(
            Engine::builder().build().unwrap_err(),
            EngineError::MissingStore
        );
    }

    #[test]
    fn today_follows_reference_timezone() {
        // 20:00 UTC is already the next day in Phnom Penh (UTC+7).
        let instant = Utc.with_ymd_and_hms(2026, 10, 15, 20, 0, 0).unwrap();
        let engine = Engine::builder()
            .store(MemoryStore::default())
            .clock(move || instant)
            .build()
            .unwrap();
        assert_eq!(engine.today(), NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
    }
}
