use std::env;

use anyhow::{Context, bail};

pub const DEFAULT_HEALTH_PORT: u16 = 8080;

/// Settings read once at startup. The bot token itself stays in the
/// environment for `Bot::from_env`.
#[derive(Debug, Clone)]
pub struct Config {
    /// The single operator allowed to use the admin panel.
    pub admin_id: i64,
    pub health_port: u16,
}

pub fn load_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();

    let token = env::var("TELOXIDE_TOKEN").unwrap_or_default();
    if token.trim().is_empty() {
        bail!("TELOXIDE_TOKEN is not set");
    }

    let admin_id_raw = env::var("ADMIN_ID").context("ADMIN_ID is not set")?;
    let admin_id = parse_admin_id(&admin_id_raw)
        .with_context(|| format!("ADMIN_ID is not a numeric Telegram id: {admin_id_raw:?}"))?;

    let health_port = env::var("HEALTH_PORT")
        .ok()
        .and_then(|port| parse_port(&port))
        .unwrap_or(DEFAULT_HEALTH_PORT);

    Ok(Config {
        admin_id,
        health_port,
    })
}

fn parse_admin_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Parsing helpers are tested directly to keep the tests independent
    // of process environment variables.

    #[test]
    fn test_parse_admin_id() {
        assert_eq!(parse_admin_id("1460213585"), Some(1460213585));
        assert_eq!(parse_admin_id(" 42 "), Some(42));
    }

    #[test]
    fn test_parse_admin_id_rejects_garbage() {
        assert_eq!(parse_admin_id(""), None);
        assert_eq!(parse_admin_id("not-an-id"), None);
        assert_eq!(parse_admin_id("12.5"), None);
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("8080"), Some(8080));
        assert_eq!(parse_port("0x50"), None);
        assert_eq!(parse_port("99999"), None);
    }
}
