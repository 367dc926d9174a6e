use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{Expense, ResultEngine};

use super::{ExpenseFilter, ExpenseStore};

/// Process-local [`ExpenseStore`]. Nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Vec<Expense>>>,
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn create(&self, expense: &Expense) -> ResultEngine<()> {
        self.inner.lock().await.push(expense.clone());
        Ok(())
    }

    async fn find(&self, filter: &ExpenseFilter) -> ResultEngine<Vec<Expense>> {
        let guard = self.inner.lock().await;
        Ok(guard.iter().filter(|e| filter.matches(e)).cloned().collect())
    }

    async fn delete_many(&self, filter: &ExpenseFilter) -> ResultEngine<u64> {
        let mut guard = self.inner.lock().await;
        let before = guard.len();
        guard.retain(|e| !filter.matches(e));
        Ok((before - guard.len()) as u64)
    }
}
