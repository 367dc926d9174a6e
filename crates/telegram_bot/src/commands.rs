//! Command structs

use teloxide::utils::command::{BotCommands, ParseError};

/// Hands the raw text after `/add` to the add handler untouched, so that
/// a missing amount or category is reported with the usage hint.
pub fn split_add(input: String) -> Result<(String,), ParseError> {
    Ok((input.trim().to_string(),))
}

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Expense tracker commands:")]
pub enum Command {
    #[command(description = "show the main menu.")]
    Start,
    #[command(description = "show the main menu.")]
    Menu,
    #[command(
        description = "record an expense, e.g. /add 15 Dinner",
        parse_with = split_add
    )]
    Add { args: String },
    #[command(description = "abandon the expense you are entering.")]
    Cancel,
    #[command(description = "show this message.")]
    Help,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_raw_arguments() {
        let cmd = Command::parse("/add 15   Dinner out", "expense_bot").unwrap();
        assert_eq!(
            cmd,
            Command::Add {
                args: "15   Dinner out".to_string()
            }
        );
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert!(Command::parse("3.5", "expense_bot").is_err());
    }
}
