use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::commands::Command;
use crate::config::Config;
use crate::handlers::{admin_panel, ui};
use crate::state::SharedState;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: SharedState,
    config: Arc<Config>,
) -> Result<(), anyhow::Error> {
    match cmd {
        Command::Start => start_handler(bot, msg, state).await,
        Command::Help => help_handler(bot, msg).await,
        Command::Unsubscribe => unsubscribe_handler(bot, msg, state).await,
        Command::Admin => admin_panel::admin_panel_handler(bot, msg, state, config).await,
    }
}

async fn start_handler(bot: Bot, msg: Message, state: SharedState) -> Result<(), anyhow::Error> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;

    let total = {
        let mut state = state.lock().await;
        if state.subscribers.subscribe(user_id) {
            log::info!("New subscriber: {} (ID: {})", user.full_name(), user_id);
        }
        state.subscribers.len()
    };

    let welcome_text = format!(
        "<b>Привет, {}!</b>\n\n\
         Вы подписались на рассылку от кадастрового инженера Глайборода И.А.!\n\
         Теперь вы будете получать:\n\
         - Актуальную информацию по кадастровым услугам\n\
         - Специальные предложения и скидки\n\n\
         Всего подписчиков: {}\n\n\
         <b>Обратите внимание:</b>",
        user.full_name(),
        total
    );

    bot.send_message(msg.chat.id, welcome_text)
        .parse_mode(ParseMode::Html)
        .reply_markup(ui::start_menu_keyboard())
        .await?;

    bot.send_message(
        msg.chat.id,
        "<b>Дополнительные команды:</b>\n\
         /help - справка по боту\n\
         /unsubscribe - отписаться от рассылки",
    )
    .parse_mode(ParseMode::Html)
    .await?;

    Ok(())
}

async fn help_handler(bot: Bot, msg: Message) -> Result<(), anyhow::Error> {
    let help_text = "<b>Справка по Kaddelo Bot</b>\n\n\
         Это бот для получения информации от кадастрового инженера Глайборода И.А.\n\n\
         <b>Основные кнопки:</b>\n\
         - АЛГОРИТМ ПОЛУЧЕНИЯ УСЛУГИ - описание процесса работ\n\
         - ОСТАВИТЬ ЗАЯВКУ - консультация по кадастровым услугам\n\n\
         <b>Команды:</b>\n\
         /start - Подписаться на рассылку\n\
         /help - Эта справка\n\
         /unsubscribe - Отписаться от рассылки\n\n\
         <b>Для связи:</b>\n\
         Отправьте заявку через кнопку или напишите напрямую.";

    bot.send_message(msg.chat.id, help_text)
        .parse_mode(ParseMode::Html)
        .reply_markup(ui::help_menu_keyboard())
        .await?;

    Ok(())
}

async fn unsubscribe_handler(bot: Bot, msg: Message, state: SharedState) -> Result<(), anyhow::Error> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;

    let removed = {
        let mut state = state.lock().await;
        state.subscribers.unsubscribe(user_id)
    };

    if removed {
        log::info!("Unsubscribed: ID {}", user_id);
        bot.send_message(msg.chat.id, "Вы отписались от рассылки.").await?;
    } else {
        bot.send_message(msg.chat.id, "Вы не были подписаны.").await?;
    }

    Ok(())
}
