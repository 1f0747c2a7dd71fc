use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::Me;

use crate::config::Config;
use crate::handlers::{admin_panel, broadcast, command, request};
use crate::routing::{AdminButton, MessageRoute, classify_message};
use crate::state::SharedState;

/// Single message endpoint: classify once, then dispatch on the variant.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    me: Me,
    state: SharedState,
    config: Arc<Config>,
) -> Result<(), anyhow::Error> {
    let sender = msg.from.as_ref().map(|user| user.id.0 as i64);
    let route = classify_message(sender, msg.text(), config.admin_id, me.username());

    match route {
        MessageRoute::Command(cmd) => command::command_handler(bot, msg, cmd, state, config).await,
        MessageRoute::AdminButton(AdminButton::Stats) => {
            admin_panel::stats_handler(bot, msg, state, config).await
        }
        MessageRoute::AdminButton(AdminButton::Broadcast) => {
            admin_panel::mailing_prompt_handler(bot, msg, state).await
        }
        MessageRoute::AdminButton(AdminButton::PromoExample) => {
            admin_panel::promo_example_handler(bot, msg).await
        }
        MessageRoute::AdminButton(AdminButton::ClosePanel) => {
            admin_panel::close_panel_handler(bot, msg).await
        }
        MessageRoute::AdminBroadcast => broadcast::broadcast_handler(bot, msg, state).await,
        MessageRoute::UserRequest => request::user_request_handler(bot, msg, state, config).await,
        MessageRoute::Ignore => Ok(()),
    }
}
