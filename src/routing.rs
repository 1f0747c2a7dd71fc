use teloxide::utils::command::BotCommands;

use crate::commands::Command;
use crate::handlers::ui::{BTN_BROADCAST, BTN_CLOSE_PANEL, BTN_PROMO, BTN_STATS};

pub const CB_SERVICE_PROCESS: &str = "techplan_process";
pub const CB_LEAVE_REQUEST: &str = "leave_request";
pub const CB_WRITE_PREFIX: &str = "write_";
pub const CB_TAKE_PREFIX: &str = "take_";

/// Reply-keyboard buttons of the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminButton {
    Stats,
    Broadcast,
    PromoExample,
    ClosePanel,
}

impl AdminButton {
    pub fn from_label(text: &str) -> Option<Self> {
        match text {
            BTN_STATS => Some(Self::Stats),
            BTN_BROADCAST => Some(Self::Broadcast),
            BTN_PROMO => Some(Self::PromoExample),
            BTN_CLOSE_PANEL => Some(Self::ClosePanel),
            _ => None,
        }
    }
}

/// Classification of one inbound message. Evaluated once per update; the
/// priority order below decides ties, in particular an admin panel button
/// wins over the broadcast catch-all.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageRoute {
    Command(Command),
    AdminButton(AdminButton),
    AdminBroadcast,
    UserRequest,
    Ignore,
}

pub fn classify_message(
    sender: Option<i64>,
    text: Option<&str>,
    admin_id: i64,
    bot_username: &str,
) -> MessageRoute {
    if let Some(text) = text {
        if let Ok(command) = Command::parse(text, bot_username) {
            return MessageRoute::Command(command);
        }
    }

    if sender == Some(admin_id) {
        if let Some(button) = text.and_then(AdminButton::from_label) {
            return MessageRoute::AdminButton(button);
        }
        // Whatever else the admin sends is the payload of the next
        // broadcast run.
        return MessageRoute::AdminBroadcast;
    }

    match (sender, text) {
        (Some(_), Some(text)) if !text.starts_with('/') => MessageRoute::UserRequest,
        _ => MessageRoute::Ignore,
    }
}

/// Inline-button actions, parameterized ones carry the target user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    ServiceProcess,
    LeaveRequest,
    WriteTo(i64),
    Take(i64),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        if data == CB_SERVICE_PROCESS {
            return Some(Self::ServiceProcess);
        }
        if data == CB_LEAVE_REQUEST {
            return Some(Self::LeaveRequest);
        }
        if let Some(id) = data.strip_prefix(CB_WRITE_PREFIX) {
            return id.parse().ok().map(Self::WriteTo);
        }
        if let Some(id) = data.strip_prefix(CB_TAKE_PREFIX) {
            return id.parse().ok().map(Self::Take);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: i64 = 1460213585;
    const CLIENT: i64 = 555;
    const BOT: &str = "kaddelo_bot";

    #[test]
    fn commands_match_for_any_sender() {
        assert_eq!(
            classify_message(Some(CLIENT), Some("/start"), ADMIN, BOT),
            MessageRoute::Command(Command::Start)
        );
        assert_eq!(
            classify_message(Some(ADMIN), Some("/admin"), ADMIN, BOT),
            MessageRoute::Command(Command::Admin)
        );
        assert_eq!(
            classify_message(Some(CLIENT), Some("/unsubscribe@kaddelo_bot"), ADMIN, BOT),
            MessageRoute::Command(Command::Unsubscribe)
        );
    }

    #[test]
    fn admin_button_label_wins_over_broadcast_catch_all() {
        assert_eq!(
            classify_message(Some(ADMIN), Some(BTN_STATS), ADMIN, BOT),
            MessageRoute::AdminButton(AdminButton::Stats)
        );
        assert_eq!(
            classify_message(Some(ADMIN), Some(BTN_BROADCAST), ADMIN, BOT),
            MessageRoute::AdminButton(AdminButton::Broadcast)
        );
    }

    #[test]
    fn admin_free_text_is_broadcast_payload() {
        assert_eq!(
            classify_message(Some(ADMIN), Some("Скидка 10% до конца месяца"), ADMIN, BOT),
            MessageRoute::AdminBroadcast
        );
        // Media without text still belongs to the admin catch-all.
        assert_eq!(
            classify_message(Some(ADMIN), None, ADMIN, BOT),
            MessageRoute::AdminBroadcast
        );
    }

    #[test]
    fn client_free_text_is_a_request() {
        assert_eq!(
            classify_message(Some(CLIENT), Some("Здравствуйте"), ADMIN, BOT),
            MessageRoute::UserRequest
        );
    }

    #[test]
    fn button_label_from_client_is_a_plain_request() {
        assert_eq!(
            classify_message(Some(CLIENT), Some(BTN_STATS), ADMIN, BOT),
            MessageRoute::UserRequest
        );
    }

    #[test]
    fn unknown_slash_text_and_textless_client_messages_are_ignored() {
        assert_eq!(
            classify_message(Some(CLIENT), Some("/frobnicate"), ADMIN, BOT),
            MessageRoute::Ignore
        );
        assert_eq!(classify_message(Some(CLIENT), None, ADMIN, BOT), MessageRoute::Ignore);
        assert_eq!(classify_message(None, Some("hello"), ADMIN, BOT), MessageRoute::Ignore);
    }

    #[test]
    fn callback_actions_parse_with_embedded_ids() {
        assert_eq!(
            CallbackAction::parse("techplan_process"),
            Some(CallbackAction::ServiceProcess)
        );
        assert_eq!(CallbackAction::parse("leave_request"), Some(CallbackAction::LeaveRequest));
        assert_eq!(CallbackAction::parse("write_555"), Some(CallbackAction::WriteTo(555)));
        assert_eq!(CallbackAction::parse("take_555"), Some(CallbackAction::Take(555)));
    }

    #[test]
    fn malformed_callback_data_is_rejected() {
        assert_eq!(CallbackAction::parse("take_"), None);
        assert_eq!(CallbackAction::parse("write_abc"), None);
        assert_eq!(CallbackAction::parse("broadcast_confirm"), None);
        assert_eq!(CallbackAction::parse(""), None);
    }
}
