use teloxide::prelude::*;
use teloxide::types::User;

use crate::config::Config;

pub fn is_admin(msg: &Message, config: &Config) -> bool {
    msg.from
        .as_ref()
        .map(|user| is_admin_user(user, config))
        .unwrap_or(false)
}

pub fn is_admin_user(user: &User, config: &Config) -> bool {
    user.id.0 as i64 == config.admin_id
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_user_id_type_conversion() {
        // Telegram user ids arrive as u64, ADMIN_ID is configured as i64.
        let admin_id: i64 = 1460213585;

        let telegram_user_id: u64 = 1460213585;
        assert!(telegram_user_id as i64 == admin_id);

        let regular_user_id: u64 = 555555;
        assert!(regular_user_id as i64 != admin_id);
    }
}
