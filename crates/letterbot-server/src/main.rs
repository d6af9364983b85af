//! Letter bot server executable
//!
//! Long-polls the Telegram Bot API and hands every incoming message to the
//! conversation flow. Each message is handled on its own task so one chat's
//! retry backoff never blocks another.

use clap::{Arg, Command};
use letterbot_core::{
    BotProcessor, FlowHandler, LetterBotConfig, SessionStore, TelegramClient,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with INFO as default if RUST_LOG not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("letterbot")
        .version("1.0.0")
        .about("Job-application letter bot")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/app/config/credentials.json"),
        )
        .arg(
            Arg::new("sessions-dir")
                .long("sessions-dir")
                .value_name("DIR")
                .help("Directory for persisted chat sessions")
                .default_value("/data/sessions"),
        )
        .arg(
            Arg::new("poll-timeout")
                .long("poll-timeout")
                .value_name("SECONDS")
                .help("Telegram long-poll timeout")
                .default_value("30"),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").unwrap();
    let config = LetterBotConfig::from_file(config_path)?;
    log::info!("Loaded configuration from {}", config_path);

    let sessions_dir = matches.get_one::<String>("sessions-dir").unwrap();
    let store = SessionStore::new(sessions_dir)?;
    log::info!("Using sessions directory: {}", sessions_dir);

    let poll_timeout: u64 = matches.get_one::<String>("poll-timeout").unwrap().parse()?;

    let telegram = TelegramClient::new(config.telegram.clone());
    let handler = Arc::new(FlowHandler::new(BotProcessor::new(&config), store));

    log::info!("Bot is now polling for messages");
    let mut offset = 0i64;

    loop {
        let updates = match telegram.get_updates(offset, poll_timeout).await {
            Ok(updates) => updates,
            Err(e) => {
                log::error!("getUpdates failed: {}", e);
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);

            let Some(message) = update.message else {
                continue;
            };
            let Some(text) = message.text else {
                continue;
            };
            let chat_id = message.chat.id;

            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                if let Err(e) = handler.handle_message(chat_id, &text).await {
                    log::error!("Failed to handle message from chat {}: {}", chat_id, e);
                }
            });
        }
    }
}
