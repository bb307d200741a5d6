use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use orzu_dil_bot::bot::{bot_command_menu, schema, AppContext};
use orzu_dil_bot::config::BotConfig;
use orzu_dil_bot::localization::init_localization;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting Orzu-Dil order bot");

    init_localization()?;

    let config = BotConfig::from_env()?;
    info!(config = ?config, "Configuration loaded");

    let bot = Bot::new(config.token.clone());

    // Start from a clean slate: no webhook, no backlog of stale updates
    bot.delete_webhook().drop_pending_updates(true).await?;

    if let Err(e) = bot.set_my_commands(bot_command_menu()).await {
        warn!(error = %e, "Failed to register command menu");
    }

    let ctx = Arc::new(AppContext::new(config));

    info!("Bot initialized, starting dispatcher");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
