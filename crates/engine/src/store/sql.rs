use async_trait::async_trait;
use sea_orm::{Condition, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Expense, ResultEngine,
    expenses::{self, day_key},
};

use super::{ExpenseFilter, ExpenseStore};

/// [`ExpenseStore`] backed by the `expenses` table.
#[derive(Clone, Debug)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

fn condition(filter: &ExpenseFilter) -> Condition {
    let mut condition = Condition::all().add(expenses::Column::UserId.eq(filter.user_id.clone()));
    if let Some(date) = filter.date {
        condition = condition.add(expenses::Column::Date.eq(day_key(date)));
    }
    condition
}

#[async_trait]
impl ExpenseStore for SqlStore {
    async fn create(&self, expense: &Expense) -> ResultEngine<()> {
        expenses::ActiveModel::from(expense)
            .insert(&self.database)
            .await?;
        Ok(())
    }

    async fn find(&self, filter: &ExpenseFilter) -> ResultEngine<Vec<Expense>> {
        expenses::Entity::find()
            .filter(condition(filter))
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    async fn delete_many(&self, filter: &ExpenseFilter) -> ResultEngine<u64> {
        let result = expenses::Entity::delete_many()
            .filter(condition(filter))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }
}
