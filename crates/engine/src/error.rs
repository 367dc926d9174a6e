//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidAmount`] thrown when an amount cannot be parsed or is not positive.
//! - [`AmountOutOfRange`] thrown when a well-formed amount does not fit into [`Money`].
//! - [`GroupedAmount`] thrown when an amount carries thousands separators.
//! - [`MalformedRecord`] thrown when a stored row cannot be turned into an [`Expense`].
//! - [`Overflow`] thrown when a total does not fit into [`Money`].
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`AmountOutOfRange`]: EngineError::AmountOutOfRange
//!  [`GroupedAmount`]: EngineError::GroupedAmount
//!  [`MalformedRecord`]: EngineError::MalformedRecord
//!  [`Overflow`]: EngineError::Overflow
//!  [`Expense`]: super::Expense
//!  [`Money`]: super::Money
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Amount out of range")]
    AmountOutOfRange { negative: bool },
    #[error("Thousands separators are not accepted: {0}")]
    GroupedAmount(String),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
    #[error("Total overflow")]
    Overflow,
    #[error("No expense store configured")]
    MissingStore,
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (
                Self::AmountOutOfRange { negative: a },
                Self::AmountOutOfRange { negative: b },
            ) => a == b,
            (Self::GroupedAmount(a), Self::GroupedAmount(b)) => a == b,
            (Self::InvalidCategory(a), Self::InvalidCategory(b)) => a == b,
            (Self::MalformedRecord(a), Self::MalformedRecord(b)) => a == b,
            (Self::Overflow, Self::Overflow) => true,
            (Self::MissingStore, Self::MissingStore) => true,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
