//! Message Handler module wiring Telegram updates to the bot handlers

use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use tracing::debug;

// Import localization
use crate::localization::t;

use super::command_handler::{handle_id, handle_post_menu, handle_start, handle_test_admins};
use super::order_handler::handle_order;
use super::{AppContext, Caller, Command};

/// Build the update schema: web app data first, then text commands
pub fn schema() -> UpdateHandler<anyhow::Error> {
    let web_app_data = dptree::filter_map(|msg: Message| {
        msg.web_app_data().map(|data| data.data.clone())
    })
    .endpoint(web_app_data_handler);

    let commands = dptree::entry()
        .filter_command::<Command>()
        .endpoint(command_handler);

    Update::filter_message()
        .branch(web_app_data)
        .branch(commands)
}

/// Commands shown in the Telegram command menu
pub fn bot_command_menu() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", t("command-start")),
        BotCommand::new("id", t("command-id")),
    ]
}

pub async fn command_handler(
    bot: Bot,
    ctx: Arc<AppContext>,
    msg: Message,
    cmd: Command,
) -> Result<()> {
    let Some(caller) = Caller::from_message(&msg) else {
        debug!(chat_id = %msg.chat.id, "Ignoring command without sender");
        return Ok(());
    };

    debug!(user_id = %caller.user_id, command = ?cmd, "Received command");

    match cmd {
        Command::Start(_) | Command::StartApp(_) => handle_start(&bot, &ctx, &caller).await,
        Command::Id => handle_id(&bot, &caller).await,
        Command::PostMenu => handle_post_menu(&bot, &ctx, &caller).await,
        Command::TestAdmins => handle_test_admins(&bot, &ctx, &caller).await.map(|_| ()),
    }
}

pub async fn web_app_data_handler(
    bot: Bot,
    ctx: Arc<AppContext>,
    msg: Message,
    raw: String,
) -> Result<()> {
    let Some(caller) = Caller::from_message(&msg) else {
        debug!(chat_id = %msg.chat.id, "Ignoring web app data without sender");
        return Ok(());
    };

    handle_order(&bot, &ctx, &caller, &raw).await.map(|_| ())
}
