use teloxide::{
    prelude::*,
    types::{CallbackQuery, ChatId, ParseMode, UserId},
    utils::command::BotCommands,
};

use crate::{
    ConfigParameters,
    commands::Command,
    error::BotError,
    service::{ExpenseService, UserRef},
    ui::{self, Reply},
};

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    if !is_allowed(&cfg, msg.from.as_ref().map(|from| from.id)) {
        return Ok(());
    }

    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let user = UserRef::from(from);
    let chat_id = msg.chat.id;

    let Some(text) = msg.text() else {
        return Ok(());
    };

    let service = &cfg.service;
    let result = match Command::parse(text, &cfg.bot_username) {
        Ok(Command::Start | Command::Menu) => service.start(&user).await,
        Ok(Command::Add { args }) => service.add_command(&user, &args).await,
        Ok(Command::Cancel) => service.cancel_flow(&user).await,
        Ok(Command::Help) => Ok(service.help()),
        Err(err) if text.trim_start().starts_with('/') => {
            tracing::debug!("unrecognized command from {}: {err}", user.id);
            Ok(service.help())
        }
        Err(_) => service.text(&user, text).await,
    };

    send_replies(&bot, chat_id, &user, result).await;
    Ok(())
}

pub(crate) async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    if !is_allowed(&cfg, Some(q.from.id)) {
        return Ok(());
    }

    // Always answered, so the client stops showing the button as pending.
    if let Err(err) = bot.answer_callback_query(q.id.clone()).await {
        tracing::warn!("failed to answer callback query: {err}");
    }

    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };
    let chat_id = message.chat().id;
    let user = UserRef::from(&q.from);

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    let Some(result) = route_callback(&cfg.service, &user, data).await else {
        tracing::warn!("Unhandled callback data: {data}");
        return Ok(());
    };

    send_replies(&bot, chat_id, &user, result).await;
    Ok(())
}

/// Runs the action behind a button. `None` for data no button carries.
async fn route_callback(
    service: &ExpenseService,
    user: &UserRef,
    data: &str,
) -> Option<Result<Vec<Reply>, BotError>> {
    let result = match data {
        ui::ADD_EXPENSE => Ok(service.begin_add(user).await),
        ui::VIEW_TRANSACTIONS => service.view_transactions(user).await,
        ui::CLEAR_DATA => Ok(service.clear_request()),
        ui::CONFIRM_CLEAR => service.confirm_clear(user).await,
        ui::CANCEL_CLEAR => Ok(service.cancel_clear()),
        ui::CANCEL_FLOW => service.cancel_flow(user).await,
        ui::NAV_MENU => service.start(user).await,
        other => {
            let index = other
                .strip_prefix(ui::CATEGORY_PREFIX)?
                .parse::<usize>()
                .ok()?;
            Ok(service.pick_category(user, index).await)
        }
    };
    Some(result)
}

/// Sends the replies in order. Each send stands on its own: a failed one is
/// logged and the next is still attempted.
async fn send_replies(
    bot: &Bot,
    chat_id: ChatId,
    user: &UserRef,
    result: Result<Vec<Reply>, BotError>,
) {
    let replies = match result {
        Ok(replies) => replies,
        Err(err) => {
            tracing::error!("request of user {} failed: {err}", user.id);
            vec![ui::render_failure()]
        }
    };

    for reply in replies {
        let mut request = bot
            .send_message(chat_id, reply.text)
            .parse_mode(ParseMode::MarkdownV2);
        if let Some(kb) = reply.keyboard {
            request = request.reply_markup(kb);
        }
        if let Err(err) = request.await {
            let err = BotError::from(err);
            tracing::warn!("failed to deliver reply to chat {}: {err}", chat_id.0);
        }
    }
}

fn is_allowed(cfg: &ConfigParameters, from: Option<UserId>) -> bool {
    let Some(from) = from else {
        return false;
    };
    match &cfg.allowed_users {
        None => true,
        Some(ids) => ids.contains(&from),
    }
}

#[cfg(test)]
mod tests {
    use engine::{Engine, MemoryStore};

    use super::*;
    use crate::state::SessionStore;

    fn config(allowed_users: Option<Vec<UserId>>) -> ConfigParameters {
        let engine = Engine::builder()
            .store(MemoryStore::default())
            .build()
            .unwrap();
        ConfigParameters {
            allowed_users,
            service: ExpenseService::new(engine, SessionStore::default()),
            bot_username: "expense_bot".to_string(),
        }
    }

    fn dara() -> UserRef {
        UserRef {
            id: 7,
            display_name: "Dara".to_string(),
        }
    }

    fn texts(replies: Vec<Reply>) -> Vec<String> {
        replies.into_iter().map(|reply| reply.text).collect()
    }

    #[tokio::test]
    async fn category_button_asks_for_amount() {
        let cfg = config(None);
        let replies = route_callback(&cfg.service, &dara(), "cat:1")
            .await
            .unwrap()
            .unwrap();
        let texts = texts(replies);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("*Coffee*"));
    }

    #[tokio::test]
    async fn menu_button_renders_menu() {
        let cfg = config(None);
        let replies = route_callback(&cfg.service, &dara(), ui::NAV_MENU)
            .await
            .unwrap()
            .unwrap();
        assert!(texts(replies)[0].contains("Welcome, Dara"));
    }

    #[tokio::test]
    async fn unknown_callback_data_is_not_routed() {
        let cfg = config(None);
        for data in ["bogus", "cat:", "cat:x"] {
            assert!(route_callback(&cfg.service, &dara(), data).await.is_none());
        }
    }

    #[test]
    fn without_allow_list_everyone_is_admitted() {
        let cfg = config(None);
        assert!(is_allowed(&cfg, Some(UserId(1))));
        assert!(is_allowed(&cfg, Some(UserId(987_654))));
    }

    #[test]
    fn allow_list_rejects_other_users() {
        let cfg = config(Some(vec![UserId(1), UserId(2)]));
        assert!(is_allowed(&cfg, Some(UserId(2))));
        assert!(!is_allowed(&cfg, Some(UserId(3))));
    }

    #[test]
    fn updates_without_sender_are_rejected() {
        assert!(!is_allowed(&config(None), None));
        assert!(!is_allowed(&config(Some(vec![UserId(1)])), None));
    }
}
