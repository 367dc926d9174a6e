//! What the bot does for each user action, independent of Telegram.
//!
//! Every entry point returns the replies to send, in order. User-input
//! mistakes become corrective replies here; store failures are returned as
//! `BotError` and turned into a generic reply by the caller.
use engine::{Engine, Money, total};
use teloxide::types::User;

use crate::{
    error::BotError,
    parsing::{normalize_category, parse_add_args, parse_amount},
    state::{FlowStep, SessionStore},
    ui::{self, QUICK_PICK, Reply},
};

type ResultBot<T> = Result<T, BotError>;

/// The requesting user: stable id plus the name used in greetings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct UserRef {
    pub id: u64,
    pub display_name: String,
}

impl UserRef {
    /// Key of the user's records in the store.
    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        let display_name = match &user.username {
            Some(username) => format!("@{username}"),
            None => user.first_name.clone(),
        };
        Self {
            id: user.id.0,
            display_name,
        }
    }
}

#[derive(Clone)]
pub(crate) struct ExpenseService {
    engine: Engine,
    sessions: SessionStore,
}

impl ExpenseService {
    pub(crate) fn new(engine: Engine, sessions: SessionStore) -> Self {
        Self { engine, sessions }
    }

    /// `/start`, `/menu` and the menu button. Abandons any guided add.
    pub(crate) async fn start(&self, user: &UserRef) -> ResultBot<Vec<Reply>> {
        self.sessions.clear(user.id).await;
        Ok(vec![self.menu(user).await?])
    }

    pub(crate) fn help(&self) -> Vec<Reply> {
        vec![ui::render_help()]
    }

    /// Single-shot `/add <amount> <category...>`.
    pub(crate) async fn add_command(&self, user: &UserRef, args: &str) -> ResultBot<Vec<Reply>> {
        match parse_add_args(args) {
            Ok((amount, category)) => self.record(user, amount, category).await,
            Err(err) => {
                tracing::debug!("rejected /add from {}: {err}", user.id);
                Ok(vec![ui::render_input_error(err)])
            }
        }
    }

    /// "Add Expense" button: offers the quick-pick categories.
    pub(crate) async fn begin_add(&self, user: &UserRef) -> Vec<Reply> {
        self.sessions.set(user.id, FlowStep::AwaitingCategory).await;
        vec![ui::render_category_picker()]
    }

    /// A quick-pick button. Replaces any category picked before.
    pub(crate) async fn pick_category(&self, user: &UserRef, index: usize) -> Vec<Reply> {
        let Some(category) = QUICK_PICK.get(index) else {
            return self.begin_add(user).await;
        };
        self.await_amount(user, category.to_string()).await
    }

    /// Any message that is not a command.
    pub(crate) async fn text(&self, user: &UserRef, text: &str) -> ResultBot<Vec<Reply>> {
        match self.sessions.get(user.id).await {
            Some(FlowStep::AwaitingAmount { category }) => match parse_amount(text) {
                Ok(amount) => self.record(user, amount, category).await,
                Err(err) => Ok(vec![ui::render_input_error(err)]),
            },
            Some(FlowStep::AwaitingCategory) => match normalize_category(text) {
                Ok(category) => Ok(self.await_amount(user, category).await),
                Err(err) => Ok(vec![ui::render_input_error(err)]),
            },
            None => Ok(vec![ui::render_hint()]),
        }
    }

    /// `/cancel` and the Cancel button of the guided add.
    pub(crate) async fn cancel_flow(&self, user: &UserRef) -> ResultBot<Vec<Reply>> {
        self.sessions.clear(user.id).await;
        Ok(vec![ui::render_flow_cancelled(), self.menu_or_failure(user).await])
    }

    pub(crate) async fn view_transactions(&self, user: &UserRef) -> ResultBot<Vec<Reply>> {
        let today = self.engine.today();
        let expenses = self.engine.expenses_for_day(&user.key(), today).await?;
        if expenses.is_empty() {
            return Ok(vec![ui::render_no_transactions()]);
        }
        let day_total = total(&expenses)?;
        Ok(vec![ui::render_transactions(today, &expenses, day_total)])
    }

    /// First half of clearing: only asks. Nothing is deleted here.
    pub(crate) fn clear_request(&self) -> Vec<Reply> {
        vec![ui::render_clear_prompt()]
    }

    pub(crate) async fn confirm_clear(&self, user: &UserRef) -> ResultBot<Vec<Reply>> {
        let removed = self.engine.clear_day(&user.key(), self.engine.today()).await?;
        tracing::info!("user {} cleared {removed} expenses", user.id);
        Ok(vec![
            ui::render_cleared(removed),
            self.menu_or_failure(user).await,
        ])
    }

    pub(crate) fn cancel_clear(&self) -> Vec<Reply> {
        vec![ui::render_clear_cancelled()]
    }

    async fn await_amount(&self, user: &UserRef, category: String) -> Vec<Reply> {
        let reply = ui::render_amount_prompt(&category);
        self.sessions
            .set(user.id, FlowStep::AwaitingAmount { category })
            .await;
        vec![reply]
    }

    /// Persists a validated expense, then confirms and shows the menu again.
    async fn record(&self, user: &UserRef, amount: Money, category: String) -> ResultBot<Vec<Reply>> {
        let expense = self
            .engine
            .add_expense(&user.key(), amount, &category)
            .await?;
        self.sessions.clear(user.id).await;
        tracing::info!("user {} added {expense}", user.id);

        Ok(vec![ui::render_added(&expense), self.menu_or_failure(user).await])
    }

    async fn menu(&self, user: &UserRef) -> ResultBot<Reply> {
        let today = self.engine.today();
        let key = user.key();
        let today_total = self.engine.total_for_day(&key, today).await?;
        let all_time_total = self.engine.total_for_user(&key).await?;
        Ok(ui::render_main_menu(
            &user.display_name,
            today,
            today_total,
            all_time_total,
        ))
    }

    /// The menu that follows a completed action. Failing to build it must not
    /// hide the confirmation that precedes it.
    async fn menu_or_failure(&self, user: &UserRef) -> Reply {
        match self.menu(user).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!("failed to render menu for user {}: {err}", user.id);
                ui::render_failure()
            }
        }
    }
}
