use std::sync::Arc;

use chrono::Local;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::config::Config;
use crate::handlers::admin::is_admin_user;
use crate::handlers::ui;
use crate::routing::CallbackAction;
use crate::state::SharedState;

const SERVICE_PROCESS_TEXT: &str = "<b>ПОРЯДОК ПОЛУЧЕНИЯ УСЛУГИ:</b>\n\n\
     1. <b>Изучение документов</b> и заключение договора\n\
     2. <b>Выезд на объект</b> для обмеров\n\
     3. <b>Подготовка документов (Технический план здания)</b>\n\
     4. <b>Передача заказчику технического плана на CD диске</b>\n\n\
     <b>Срок исполнения:</b> 2-3 рабочих дня";

const LEAVE_REQUEST_TEXT: &str = "<b>ОТПРАВЬТЕ ВАШЕ СООБЩЕНИЕ</b>\n\n\
     Напишите сообщение для кадастрового инженера.";

const CLIENT_REPLY_TEXT: &str = "<b>Сообщение от кадастрового инженера</b>\n\n\
     Здравствуйте! Получил Вашу заявку, рассмотрю в течение рабочего дня. \
     Пока Вы можете оставить свои контакты для связи и более подробной \
     консультации по заказу";

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    state: SharedState,
    config: Arc<Config>,
) -> Result<(), anyhow::Error> {
    let Some(data) = q.data.as_deref() else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };
    log::info!("Received callback query with data: {}", data);

    let Some(action) = CallbackAction::parse(data) else {
        log::warn!("Unknown callback data: {}", data);
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let Some(message) = q.message.as_ref().and_then(|m| m.regular_message()) else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    match action {
        CallbackAction::ServiceProcess => {
            bot.send_message(message.chat.id, SERVICE_PROCESS_TEXT)
                .parse_mode(ParseMode::Html)
                .reply_markup(ui::leave_request_keyboard())
                .await?;
            bot.answer_callback_query(q.id.clone()).await?;
        }
        CallbackAction::LeaveRequest => {
            bot.send_message(message.chat.id, LEAVE_REQUEST_TEXT)
                .parse_mode(ParseMode::Html)
                .await?;
            bot.answer_callback_query(q.id.clone())
                .text("Напишите ваше сообщение в чат")
                .await?;
        }
        CallbackAction::WriteTo(user_id) => {
            if !is_admin_user(&q.from, &config) {
                bot.answer_callback_query(q.id.clone())
                    .text("Доступ запрещен")
                    .show_alert(true)
                    .await?;
                return Ok(());
            }
            write_to_client(&bot, &q, message, user_id).await?;
        }
        CallbackAction::Take(user_id) => {
            if !is_admin_user(&q.from, &config) {
                bot.answer_callback_query(q.id.clone())
                    .text("Доступ запрещен")
                    .show_alert(true)
                    .await?;
                return Ok(());
            }
            take_request(&bot, &q, message, user_id, &state).await?;
        }
    }

    Ok(())
}

/// Sends the canned first reply to the client and reports the outcome to
/// the operator. Delivery can fail (blocked bot, stale id), the error is
/// rendered, never propagated.
async fn write_to_client(
    bot: &Bot,
    q: &CallbackQuery,
    message: &Message,
    user_id: i64,
) -> Result<(), anyhow::Error> {
    match bot
        .send_message(ChatId(user_id), CLIENT_REPLY_TEXT)
        .parse_mode(ParseMode::Html)
        .await
    {
        Ok(_) => {
            bot.send_message(
                message.chat.id,
                format!(
                    "<b>Сообщение отправлено клиенту!</b>\n\n\
                     ID клиента: <code>{user_id}</code>\n\
                     Клиент получил ваше сообщение."
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;

            bot.answer_callback_query(q.id.clone())
                .text("Сообщение отправлено клиенту!")
                .await?;
        }
        Err(e) => {
            log::warn!("Failed to write to client {}: {}", user_id, e);
            bot.send_message(
                message.chat.id,
                format!(
                    "<b>Не удалось отправить сообщение</b>\n\n\
                     Ошибка: {e}\n\n\
                     ID клиента: <code>{user_id}</code>"
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;

            bot.answer_callback_query(q.id.clone())
                .text("Ошибка отправки")
                .show_alert(true)
                .await?;
        }
    }

    Ok(())
}

/// Transitions the client's request to in-progress and annotates the
/// notification message in place. A miss in the log is not surfaced to
/// the operator, the annotation happens either way.
async fn take_request(
    bot: &Bot,
    q: &CallbackQuery,
    message: &Message,
    user_id: i64,
    state: &SharedState,
) -> Result<(), anyhow::Error> {
    let taken = {
        let mut state = state.lock().await;
        state.requests.take(user_id)
    };
    if !taken {
        log::warn!("Take action for unknown requester id {}", user_id);
    }

    let annotated = format!(
        "{}\n\n<b>Заявка взята в работу</b>\nВремя: {}",
        message.text().unwrap_or_default(),
        Local::now().format("%H:%M")
    );
    bot.edit_message_text(message.chat.id, message.id, annotated)
        .parse_mode(ParseMode::Html)
        .await?;

    bot.answer_callback_query(q.id.clone())
        .text("Заявка взята в работу!")
        .await?;

    Ok(())
}
