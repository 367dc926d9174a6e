//! The module contains the `Expense` type, one spending record of a user.
//!
//! Rows coming out of the `expenses` table are converted into `Expense`
//! through `TryFrom<Model>`, which rejects anything breaking the record
//! invariants instead of letting it reach the totals.
use core::fmt;

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, Money, ResultEngine};

/// Format of the day key used to bucket expenses (`YYYY-MM-DD`).
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Renders the sortable day key of a calendar date.
#[must_use]
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// One persisted expense of a user.
///
/// Records are immutable: the only way to get rid of one is a bulk delete
/// by user and day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub user_id: String,
    pub date: NaiveDate,
    pub amount: Money,
    pub category: String,
}

impl Expense {
    /// Builds a record, enforcing `amount > 0` and a non-empty category.
    ///
    /// The category is stored trimmed but otherwise as given.
    pub fn new(
        user_id: impl Into<String>,
        date: NaiveDate,
        amount: Money,
        category: &str,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(format!(
                "amount must be > 0, got {amount}"
            )));
        }
        let category = category.trim();
        if category.is_empty() {
            return Err(EngineError::InvalidCategory("empty category".to_string()));
        }

        Ok(Self {
            user_id: user_id.into(),
            date,
            amount,
            category: category.to_string(),
        })
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", day_key(self.date), self.amount, self.category)
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&model.date, DAY_KEY_FORMAT).map_err(|_| {
            EngineError::MalformedRecord(format!(
                "expense {}: invalid date '{}'",
                model.id, model.date
            ))
        })?;

        Expense::new(
            model.user_id,
            date,
            Money::new(model.amount_minor),
            &model.category,
        )
        .map_err(|err| EngineError::MalformedRecord(format!("expense {}: {err}", model.id)))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub date: String,
    pub amount_minor: i64,
    pub category: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(expense.user_id.clone()),
            date: ActiveValue::Set(day_key(expense.date)),
            amount_minor: ActiveValue::Set(expense.amount.minor()),
            category: ActiveValue::Set(expense.category.clone()),
        }
    }
}
