use std::sync::Arc;

use anyhow::Error;
use teloxide::dptree;
use teloxide::prelude::*;

use crate::handlers::{callback_handler, message_handler};
use crate::state::{AppState, SharedState};

mod commands;
mod config;
mod handlers;
mod health;
mod routing;
mod state;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // --- Logging Setup ---
    use log::LevelFilter;
    use std::env;
    use std::io::Write;

    let console_level_str = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let console_level = match console_level_str.to_uppercase().as_str() {
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        _ => LevelFilter::Info,
    };

    let mut builder = pretty_env_logger::formatted_builder();
    builder
        .filter(None, console_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    log::info!("Starting Kaddelo bot...");
    let start_time = std::time::Instant::now();

    let config = match config::load_environment() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            log::error!("Failed to load environment: {}", e);
            return Err(e);
        }
    };
    log::info!("Admin ID: {}", config.admin_id);

    let state: SharedState = Arc::new(tokio::sync::Mutex::new(AppState::default()));

    tokio::spawn(health::run(config.health_port));

    let bot = Bot::from_env();
    match bot.get_me().await {
        Ok(me) => log::info!("Bot connected: @{}", me.username()),
        Err(e) => {
            log::error!("Connection error: {}. Check the bot token", e);
            return Err(e.into());
        }
    }

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler));

    log::info!("Bot initialization completed in {:.2?}", start_time.elapsed());
    log::info!("Starting to dispatch updates...");

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state, config])
        .enable_ctrlc_handler()
        .build();

    tokio::select! {
        _ = dispatcher.dispatch() => {},
        _ = tokio::signal::ctrl_c() => {
            log::info!("Received Ctrl+C, shutting down...");
        }
    }

    log::info!("Bot shutdown complete");
    Ok(())
}
