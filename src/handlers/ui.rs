use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

use crate::routing::{CB_LEAVE_REQUEST, CB_SERVICE_PROCESS, CB_TAKE_PREFIX, CB_WRITE_PREFIX};

pub const BTN_STATS: &str = "Статистика";
pub const BTN_BROADCAST: &str = "Сделать рассылку";
pub const BTN_PROMO: &str = "Пример акции";
pub const BTN_CLOSE_PANEL: &str = "Закрыть панель";

pub fn admin_panel_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(BTN_STATS)],
        vec![KeyboardButton::new(BTN_BROADCAST)],
        vec![KeyboardButton::new(BTN_PROMO)],
        vec![KeyboardButton::new(BTN_CLOSE_PANEL)],
    ])
    .resize_keyboard()
}

pub fn start_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "ПОРЯДОК ПОЛУЧЕНИЯ УСЛУГИ",
            CB_SERVICE_PROCESS,
        )],
        vec![InlineKeyboardButton::callback(
            "ОСТАВИТЬ ЗАЯВКУ НА КОНСУЛЬТАЦИЮ",
            CB_LEAVE_REQUEST,
        )],
    ])
}

pub fn help_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "АЛГОРИТМ ПОЛУЧЕНИЯ УСЛУГИ",
            CB_SERVICE_PROCESS,
        )],
        vec![InlineKeyboardButton::callback("ОСТАВИТЬ ЗАЯВКУ", CB_LEAVE_REQUEST)],
    ])
}

pub fn leave_request_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "ОСТАВИТЬ ЗАЯВКУ",
        CB_LEAVE_REQUEST,
    )]])
}

/// One row of actions under a request notification, both parameterized
/// with the requester's id.
pub fn request_actions_keyboard(user_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("Написать клиенту", format!("{CB_WRITE_PREFIX}{user_id}")),
        InlineKeyboardButton::callback("Взять в работу", format!("{CB_TAKE_PREFIX}{user_id}")),
    ]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::CallbackAction;

    #[test]
    fn request_action_buttons_round_trip_through_the_parser() {
        let keyboard = request_actions_keyboard(555);
        let row = &keyboard.inline_keyboard[0];
        assert_eq!(row.len(), 2);

        let datas: Vec<&str> = row
            .iter()
            .filter_map(|button| match &button.kind {
                teloxide::types::InlineKeyboardButtonKind::CallbackData(data) => Some(data.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            datas.iter().map(|d| CallbackAction::parse(d)).collect::<Vec<_>>(),
            vec![Some(CallbackAction::WriteTo(555)), Some(CallbackAction::Take(555))]
        );
    }
}
