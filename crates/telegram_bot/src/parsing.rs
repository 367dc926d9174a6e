use engine::{EngineError, Money};

/// Mistakes in what the user typed. Always answered with a corrective
/// message, never treated as a failure of the bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum InputError {
    #[error("usage: /add <amount> <category>")]
    Usage,
    #[error("amount is not a number")]
    InvalidAmount,
    #[error("amount has thousands separators")]
    GroupedAmount,
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("category is empty")]
    MissingCategory,
}

/// Parses the arguments of a single-shot `/add`.
///
/// The first whitespace-separated token is the amount, everything after it
/// (internal spacing preserved) is the category. Checks run in order:
/// token count, amount, category.
pub(crate) fn parse_add_args(args: &str) -> Result<(Money, String), InputError> {
    let trimmed = args.trim();
    let Some((amount, category)) = trimmed.split_once(char::is_whitespace) else {
        return Err(InputError::Usage);
    };

    let amount = parse_amount(amount)?;
    let category = normalize_category(category)?;
    Ok((amount, category))
}

/// Parses a strictly positive amount.
///
/// A negative number is `NonPositiveAmount` even when it is too large to be
/// represented.
pub(crate) fn parse_amount(input: &str) -> Result<Money, InputError> {
    let amount = input
        .trim()
        .parse::<Money>()
        .map_err(|err| match err {
            EngineError::AmountOutOfRange { negative: true } => InputError::NonPositiveAmount,
            EngineError::GroupedAmount(_) => InputError::GroupedAmount,
            _ => InputError::InvalidAmount,
        })?;
    if !amount.is_positive() {
        return Err(InputError::NonPositiveAmount);
    }
    Ok(amount)
}

/// Trims the category and uppercases its first character.
pub(crate) fn normalize_category(input: &str) -> Result<String, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InputError::MissingCategory);
    }
    Ok(capitalize(trimmed))
}

fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
