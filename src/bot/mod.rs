//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: teloxide endpoints and the update schema
//! - `command_handler`: /start, /startapp, /id, /post_menu, /test_admins
//! - `order_handler`: orders submitted from the menu web app
//! - `ui_builder`: keyboards and message texts

pub mod command_handler;
pub mod message_handler;
pub mod order_handler;
pub mod ui_builder;

use teloxide::types::{ChatId, Message, UserId};
use teloxide::utils::command::BotCommands;

use crate::config::BotConfig;
use crate::rate_limit::StartLimiter;

// Re-export main handler functions for use in main.rs
pub use message_handler::{bot_command_menu, schema};

/// Text commands understood by the bot
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "snake_case")]
pub enum Command {
    /// Deep-link payload, if any, is ignored
    Start(String),
    #[command(rename = "startapp")]
    StartApp(String),
    Id,
    PostMenu,
    TestAdmins,
}

/// Shared state injected into every handler
#[derive(Debug)]
pub struct AppContext {
    pub config: BotConfig,
    pub limiter: StartLimiter,
}

impl AppContext {
    pub fn new(config: BotConfig) -> Self {
        let limiter = StartLimiter::new(config.start_cooldown);
        Self { config, limiter }
    }
}

/// The user who sent a command or an order
#[derive(Debug, Clone, PartialEq)]
pub struct Caller {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub username: Option<String>,
    pub full_name: String,
}

impl Caller {
    /// Extract the sender of a message; channel posts have none
    pub fn from_message(msg: &Message) -> Option<Self> {
        let user = msg.from.as_ref()?;
        Some(Self {
            user_id: user.id,
            chat_id: msg.chat.id,
            username: user.username.clone(),
            full_name: user.full_name(),
        })
    }

    /// `@username` when the user has one, otherwise the full name
    pub fn telegram_label(&self) -> String {
        match &self.username {
            Some(username) => format!("@{username}"),
            None => self.full_name.clone(),
        }
    }
}
