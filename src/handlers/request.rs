use std::sync::Arc;

use chrono::Local;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::config::Config;
use crate::handlers::ui;
use crate::state::SharedState;

/// Free text from a non-admin sender becomes a tracked request. The
/// client gets a confirmation, the engineer gets a notification with the
/// two action buttons.
pub async fn user_request_handler(
    bot: Bot,
    msg: Message,
    state: SharedState,
    config: Arc<Config>,
) -> Result<(), anyhow::Error> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let user_id = user.id.0 as i64;
    let user_name = match user.full_name() {
        name if name.is_empty() => "Без имени".to_string(),
        name => name,
    };
    let username = user.username.clone().unwrap_or_else(|| "Нет username".to_string());

    {
        let mut state = state.lock().await;
        state
            .requests
            .record(user_id, user_name.clone(), username.clone(), text.to_string());
    }
    log::info!("New request from {} (ID: {})", user_name, user_id);

    bot.send_message(
        msg.chat.id,
        "<b>СООБЩЕНИЕ ОТПРАВЛЕНО!</b>\n\n\
         Кадастровый инженер получил сообщение и свяжется с Вами в течение рабочего дня.",
    )
    .parse_mode(ParseMode::Html)
    .await?;

    let notification = format!(
        "<b>НОВАЯ ЗАЯВКА ОТ КЛИЕНТА!</b>\n\n\
         <b>Клиент:</b> {user_name}\n\
         <b>Username:</b> @{username}\n\
         <b>ID:</b> <code>{user_id}</code>\n\
         <b>Время:</b> {}\n\n\
         <b>Сообщение:</b>\n{text}",
        Local::now().format("%d.%m.%Y %H:%M")
    );

    // The request is already recorded; a lost notification must not take
    // the handler down with it.
    if let Err(e) = bot
        .send_message(ChatId(config.admin_id), notification)
        .parse_mode(ParseMode::Html)
        .reply_markup(ui::request_actions_keyboard(user_id))
        .await
    {
        log::error!("Failed to notify admin about request from {}: {}", user_id, e);
    }

    Ok(())
}
