use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{KeyboardRemove, ParseMode};

use crate::config::Config;
use crate::handlers::admin::is_admin;
use crate::handlers::ui;
use crate::state::SharedState;

/// `/admin` entry point. The reply keyboard stays up until the operator
/// closes the panel.
pub async fn admin_panel_handler(
    bot: Bot,
    msg: Message,
    state: SharedState,
    config: Arc<Config>,
) -> Result<(), anyhow::Error> {
    if !is_admin(&msg, &config) {
        bot.send_message(msg.chat.id, "Access denied").await?;
        return Ok(());
    }

    let (subscriber_count, request_count) = {
        let state = state.lock().await;
        (state.subscribers.len(), state.requests.len())
    };
    let admin_name = msg.from.as_ref().map(|user| user.full_name()).unwrap_or_default();

    let admin_text = format!(
        "<b>Панель администратора</b>\n\n\
         Бот: Kaddelo Bot\n\
         Админ: {admin_name}\n\
         Подписчиков: {subscriber_count}\n\
         Заявок: {request_count}\n\n\
         <b>Используйте кнопки ниже:</b>"
    );

    bot.send_message(msg.chat.id, admin_text)
        .parse_mode(ParseMode::Html)
        .reply_markup(ui::admin_panel_keyboard())
        .await?;

    Ok(())
}

/// "Статистика" button: read-only view over the registry and the log.
pub async fn stats_handler(
    bot: Bot,
    msg: Message,
    state: SharedState,
    config: Arc<Config>,
) -> Result<(), anyhow::Error> {
    let stats_text = {
        let state = state.lock().await;

        let mut text = format!(
            "<b>Статистика Kaddelo Bot</b>\n\n\
             Всего подписчиков: <b>{}</b>\n\
             Активных заявок: <b>{}</b>\n\
             Админ ID: <code>{}</code>\n\n\
             <b>Последние 5 подписчиков:</b>\n",
            state.subscribers.len(),
            state.requests.len(),
            config.admin_id
        );

        if state.subscribers.is_empty() {
            text.push_str("Пока нет подписчиков\n");
        } else {
            for (i, user_id) in state.subscribers.last(5).iter().enumerate() {
                text.push_str(&format!("{}. <code>{}</code>\n", i + 1, user_id));
            }
        }

        if !state.requests.is_empty() {
            text.push_str("\n<b>Последние 3 заявки:</b>\n");
            for (i, request) in state.requests.last(3).iter().enumerate() {
                text.push_str(&format!(
                    "{}. ID: <code>{}</code> ({})\n",
                    i + 1,
                    request.user_id,
                    request.created_at.format("%d.%m %H:%M")
                ));
            }
        }

        text
    };

    bot.send_message(msg.chat.id, stats_text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

/// "Сделать рассылку" button: announces readiness and drops the panel
/// keyboard. The next free-text admin message is the payload.
pub async fn mailing_prompt_handler(
    bot: Bot,
    msg: Message,
    state: SharedState,
) -> Result<(), anyhow::Error> {
    let subscriber_count = {
        let state = state.lock().await;
        state.subscribers.len()
    };

    if subscriber_count == 0 {
        bot.send_message(msg.chat.id, "Нет подписчиков для рассылки!").await?;
        return Ok(());
    }

    let mailing_text = format!(
        "<b>Готов к рассылке!</b>\n\n\
         Получателей: {subscriber_count}\n\n\
         <b>Отправьте сообщение, которое нужно разослать:</b>\n\
         - Можно отправить текст\n\
         - Можно отправить фото с подписью\n\
         - Можно отправить видео с подписью\n\n\
         Сообщение будет отправлено всем {subscriber_count} подписчикам."
    );

    bot.send_message(msg.chat.id, mailing_text)
        .parse_mode(ParseMode::Html)
        .reply_markup(KeyboardRemove::new())
        .await?;

    Ok(())
}

/// "Пример акции" button: promo template the operator can copy into a
/// broadcast.
pub async fn promo_example_handler(bot: Bot, msg: Message) -> Result<(), anyhow::Error> {
    let promo_text = "<b>АКЦИЯ ОТ KADDELO!</b>\n\n\
         <b>СКИДКА 10%</b> на технический план нежилого здания:\n\
         - Гараж\n\
         - Летняя кухня\n\
         - Хозблок\n\
         Только до 20 января!\n\n\
         Бесплатная консультация\n\
         Отслеживаем результат работ\n\
         Срочный заказ\n\n\
         Оставляйте заявку прямо в боте!";

    bot.send_message(msg.chat.id, "<b>Пример рекламного сообщения:</b>")
        .parse_mode(ParseMode::Html)
        .await?;

    bot.send_message(msg.chat.id, promo_text)
        .parse_mode(ParseMode::Html)
        .reply_markup(ui::help_menu_keyboard())
        .await?;

    bot.send_message(
        msg.chat.id,
        "<i>Скопируйте этот текст для рассылки или создайте свой</i>",
    )
    .parse_mode(ParseMode::Html)
    .await?;

    Ok(())
}

pub async fn close_panel_handler(bot: Bot, msg: Message) -> Result<(), anyhow::Error> {
    bot.send_message(msg.chat.id, "Панель закрыта. Напишите /admin чтобы открыть снова.")
        .reply_markup(KeyboardRemove::new())
        .await?;

    Ok(())
}
