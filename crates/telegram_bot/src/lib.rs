//! Telegram bot.
//!
//! The bot owns no data: every action goes through the expense [`Engine`],
//! and the only thing kept here is the in-memory state of guided adds.

use engine::Engine;
use teloxide::{prelude::*, utils::command::BotCommands};

mod commands;
mod error;
mod handlers;
mod parsing;
mod service;
mod state;
mod ui;

pub use error::BotError;

use crate::{commands::Command, service::ExpenseService, state::SessionStore};

#[derive(Clone)]
pub struct ConfigParameters {
    allowed_users: Option<Vec<UserId>>,
    service: ExpenseService,
    bot_username: String,
}

pub struct Bot {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    engine: Engine,
}

impl Bot {
    pub fn new(token: &str, allowed_users: Option<Vec<UserId>>, engine: Engine) -> Self {
        Self {
            token: token.to_string(),
            allowed_users,
            engine,
        }
    }

    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    /// Registers the command list and dispatches updates until Ctrl-C.
    pub async fn run(&self) -> Result<(), BotError> {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);

        let me = bot.get_me().await?;
        let bot_username = me.username().to_string();
        tracing::info!("Logged in as @{bot_username}");

        if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
            tracing::warn!("failed to register bot commands: {err}");
        }

        let parameters = ConfigParameters {
            allowed_users: self.allowed_users.clone(),
            service: ExpenseService::new(self.engine.clone(), SessionStore::default()),
            bot_username,
        };

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handlers::handle_message))
            .branch(Update::filter_callback_query().endpoint(handlers::handle_callback));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}

#[derive(Default)]
pub struct BotBuilder {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    engine: Option<Engine>,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    /// Telegram user ids allowed to use the bot. Empty keeps it open to all.
    pub fn allowed_users(mut self, allowed_users: &[u64]) -> BotBuilder {
        if !allowed_users.is_empty() {
            self.allowed_users = Some(allowed_users.iter().copied().map(UserId).collect());
        }
        self
    }

    pub fn engine(mut self, engine: Engine) -> BotBuilder {
        self.engine = Some(engine);
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        if self.token.trim().is_empty() {
            return Err("telegram bot token is empty".to_string());
        }
        let engine = self
            .engine
            .ok_or_else(|| "telegram bot needs an expense engine".to_string())?;
        Ok(Bot::new(&self.token, self.allowed_users, engine))
    }
}
