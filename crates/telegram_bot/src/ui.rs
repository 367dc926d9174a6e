//! Rendering of every message the bot sends.
//!
//! Texts are MarkdownV2. Each raw value (names, categories, amounts, dates
//! and the static copy around them) goes through `escape` exactly once; only
//! the `*` of bold spans is added afterwards.
use chrono::NaiveDate;
use engine::{Currency, Expense, Money, day_key};
use teloxide::{
    types::{InlineKeyboardButton, InlineKeyboardMarkup},
    utils::{
        command::BotCommands,
        markdown::{bold, code_inline, escape},
    },
};

use crate::{commands::Command, parsing::InputError};

pub(crate) const ADD_EXPENSE: &str = "add_expense";
pub(crate) const VIEW_TRANSACTIONS: &str = "view_transactions";
pub(crate) const CLEAR_DATA: &str = "clear_data";
pub(crate) const CONFIRM_CLEAR: &str = "confirm_clear";
pub(crate) const CANCEL_CLEAR: &str = "cancel_clear";
pub(crate) const CANCEL_FLOW: &str = "flow:cancel";
pub(crate) const NAV_MENU: &str = "nav:menu";
pub(crate) const CATEGORY_PREFIX: &str = "cat:";

/// One-tap categories offered by the guided add flow.
pub(crate) const QUICK_PICK: &[&str] = &[
    "Food",
    "Coffee",
    "Transport",
    "Shopping",
    "Bills",
    "Other",
];

const LONG_DATE_FORMAT: &str = "%B %-d, %Y";

/// A message ready to be sent: MarkdownV2 text plus optional buttons.
#[derive(Clone, Debug)]
pub(crate) struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Reply {
    fn text(text: String) -> Self {
        Self {
            text,
            keyboard: None,
        }
    }

    fn with_keyboard(text: String, keyboard: InlineKeyboardMarkup) -> Self {
        Self {
            text,
            keyboard: Some(keyboard),
        }
    }
}

fn currency() -> &'static str {
    Currency::default().code()
}

/// `1,234.5 KHR`, escaped.
fn display_amount(amount: Money) -> String {
    escape(&format!("{} {}", amount.grouped(), currency()))
}

fn long_date(day: NaiveDate) -> String {
    day.format(LONG_DATE_FORMAT).to_string()
}

fn menu_button() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "🏠 Menu", NAV_MENU,
    )]])
}

pub(crate) fn render_main_menu(
    display_name: &str,
    today: NaiveDate,
    today_total: Money,
    all_time_total: Money,
) -> Reply {
    let text = format!(
        "👋 Welcome, {}\n\n📅 {}\n\n💰 Today's Total Expense: {}\n📈 All\\-time Total: {}\n\n{}",
        escape(display_name),
        escape(&long_date(today)),
        bold(&display_amount(today_total)),
        display_amount(all_time_total),
        escape("Track your expenses easily. Choose an option below:"),
    );

    let kb = InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("➕ Add Expense", ADD_EXPENSE)],
        vec![
            InlineKeyboardButton::callback("📜 View Transactions", VIEW_TRANSACTIONS),
            InlineKeyboardButton::callback("🗑 Clear Data", CLEAR_DATA),
        ],
    ]);

    Reply::with_keyboard(text, kb)
}

/// Confirmation echo: raw amount, category and the day key.
pub(crate) fn render_added(expense: &Expense) -> Reply {
    Reply::text(format!(
        "✅ {} added for {} on {}",
        bold(&escape(&format!("{}{}", currency(), expense.amount))),
        bold(&escape(&expense.category)),
        escape(&day_key(expense.date)),
    ))
}

pub(crate) fn render_transactions(day: NaiveDate, expenses: &[Expense], total: Money) -> Reply {
    let mut text = format!(
        "📅 {}\n",
        bold(&escape(&format!("Transactions for {}:", long_date(day))))
    );
    for (idx, expense) in expenses.iter().enumerate() {
        text.push_str(&format!(
            "\n{} {} — {}",
            escape(&format!("{}.", idx + 1)),
            bold(&escape(&expense.category)),
            display_amount(expense.amount),
        ));
    }
    text.push_str(&format!("\n\n💰 Total: {}", bold(&display_amount(total))));

    Reply::with_keyboard(text, menu_button())
}

pub(crate) fn render_no_transactions() -> Reply {
    Reply::with_keyboard(escape("📜 No transactions recorded today."), menu_button())
}

pub(crate) fn render_clear_prompt() -> Reply {
    let kb = InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("✅ Yes, Clear", CONFIRM_CLEAR)],
        vec![InlineKeyboardButton::callback("❌ Cancel", CANCEL_CLEAR)],
    ]);
    Reply::with_keyboard(
        escape("⚠️ Are you sure you want to clear today's expenses? This action cannot be undone."),
        kb,
    )
}

pub(crate) fn render_cleared(removed: u64) -> Reply {
    let noun = if removed == 1 { "entry" } else { "entries" };
    Reply::text(escape(&format!(
        "✅ All today's expenses have been cleared ({removed} {noun} removed)."
    )))
}

pub(crate) fn render_clear_cancelled() -> Reply {
    Reply::text(escape("❌ Action cancelled. Your data is safe."))
}

pub(crate) fn render_category_picker() -> Reply {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = QUICK_PICK
        .chunks(3)
        .enumerate()
        .map(|(row, names)| {
            names
                .iter()
                .enumerate()
                .map(|(col, name)| {
                    InlineKeyboardButton::callback(
                        *name,
                        format!("{CATEGORY_PREFIX}{}", row * 3 + col),
                    )
                })
                .collect()
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback("❌ Cancel", CANCEL_FLOW)]);

    let text = format!(
        "{}\n\n{} {}",
        escape("🚀 Pick a category below, or type your own."),
        escape("⚡️ Quick add:"),
        code_inline("/add 15 Dinner"),
    );
    Reply::with_keyboard(text, InlineKeyboardMarkup::new(rows))
}

pub(crate) fn render_amount_prompt(category: &str) -> Reply {
    let kb = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "❌ Cancel",
        CANCEL_FLOW,
    )]]);
    Reply::with_keyboard(
        format!(
            "💵 Enter the amount for {} {}",
            bold(&escape(category)),
            escape("(e.g. 3.5):"),
        ),
        kb,
    )
}

pub(crate) fn render_flow_cancelled() -> Reply {
    Reply::text(escape("❌ Cancelled. Nothing was recorded."))
}

pub(crate) fn render_input_error(err: InputError) -> Reply {
    let text = match err {
        InputError::Usage => format!(
            "❌ Usage: {}\n{} {}",
            code_inline("/add <amount> <category>"),
            escape("Example:"),
            code_inline("/add 10 Lunch"),
        ),
        InputError::InvalidAmount => escape("❌ Please enter a valid amount, e.g. 3.5"),
        InputError::GroupedAmount => format!(
            "{} {}",
            escape("❌ Please write the amount without thousands separators, e.g."),
            code_inline("5000"),
        ),
        InputError::NonPositiveAmount => escape("❌ The amount must be greater than zero."),
        InputError::MissingCategory => escape("❌ Please provide a category."),
    };
    Reply::text(text)
}

pub(crate) fn render_help() -> Reply {
    Reply::text(escape(&Command::descriptions().to_string()))
}

/// Answer to free text when no guided add is in progress.
pub(crate) fn render_hint() -> Reply {
    Reply::with_keyboard(
        format!(
            "{} {} {}",
            escape("🤔 Not sure what to do with that. Try"),
            code_inline("/add 15 Dinner"),
            escape("or open the menu."),
        ),
        menu_button(),
    )
}

/// Generic answer when storage or delivery failed.
pub(crate) fn render_failure() -> Reply {
    Reply::text(escape("⚠️ Something went wrong. Please try again later."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn expense(minor: i64, category: &str) -> Expense {
        Expense::new("42", day(), Money::new(minor), category).unwrap()
    }

    #[test]
    fn menu_shows_long_date_and_grouped_totals() {
        let reply = render_main_menu("@alice", day(), Money::new(1_250_000), Money::new(35_050));
        assert!(reply.text.contains("Welcome, @alice"));
        assert!(reply.text.contains("October 16, 2026"));
        assert!(reply.text.contains("*12,500 KHR*"));
        assert!(reply.text.contains("350\\.5 KHR"));
        assert!(reply.text.ends_with("easily\\. Choose an option below:"));
        assert!(reply.keyboard.is_some());
    }

    #[test]
    fn dynamic_values_are_escaped() {
        let reply = render_main_menu("first_name (test)", day(), Money::ZERO, Money::ZERO);
        assert!(reply.text.contains("first\\_name \\(test\\)"));

        let added = render_added(&expense(350, "Snacks*[promo]"));
        assert!(added.text.contains("*Snacks\\*\\[promo\\]*"));
    }

    #[test]
    fn added_echoes_raw_amount_and_day_key() {
        let reply = render_added(&expense(123_450, "Rent"));
        assert_eq!(
            reply.text,
            "✅ *KHR1234\\.5* added for *Rent* on 2026\\-10\\-16"
        );
    }

    #[test]
    fn transactions_are_numbered_from_one() {
        let expenses = vec![expense(1_000, "Lunch"), expense(200_000, "Lunch")];
        let reply = render_transactions(day(), &expenses, Money::new(201_000));
        assert!(reply.text.contains("\n1\\. *Lunch* — 10 KHR"));
        assert!(reply.text.contains("\n2\\. *Lunch* — 2,000 KHR"));
        assert!(reply.text.contains("Total: *2,010 KHR*"));
        assert!(!reply.text.contains("3\\."));
    }

    #[test]
    fn category_picker_offers_every_quick_pick() {
        let reply = render_category_picker();
        let kb = reply.keyboard.unwrap();
        let buttons: usize = kb.inline_keyboard.iter().map(Vec::len).sum();
        assert_eq!(buttons, QUICK_PICK.len() + 1);
    }

    #[test]
    fn grouped_amount_gets_its_own_hint() {
        let reply = render_input_error(InputError::GroupedAmount);
        assert!(reply.text.contains("thousands separators"));
        assert!(reply.text.ends_with("`5000`"));
    }

    #[test]
    fn static_copy_is_escaped() {
        assert_eq!(
            render_clear_cancelled().text,
            "❌ Action cancelled\\. Your data is safe\\."
        );
        assert_eq!(
            render_cleared(2).text,
            "✅ All today's expenses have been cleared \\(2 entries removed\\)\\."
        );
    }
}
