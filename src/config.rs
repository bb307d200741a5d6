//! # Bot Configuration Module
//!
//! Startup configuration: the bot token (required) plus the fixed constants of
//! the deployment, each overridable through an environment variable.

use std::time::Duration;
use teloxide::types::{ChatId, Recipient, UserId};
use url::Url;

// Defaults for the production deployment
pub const DEFAULT_BOT_USERNAME: &str = "ORZUDILbot";
pub const DEFAULT_BRAND: &str = "ORZU-DIL";
pub const DEFAULT_CHANNEL: &str = "@ORZUDILKAFE";
pub const DEFAULT_ADMIN_IDS: [i64; 3] = [6013591658, 1076937219, 117347904];
pub const DEFAULT_MAIN_ADMIN_ID: i64 = 6013591658;
pub const DEFAULT_WEBAPP_URL: &str = "https://tahirovdd-lang.github.io/orzu-dil/?v=1";
pub const DEFAULT_START_COOLDOWN_SECS: f64 = 2.0;

/// Configuration errors, all fatal at startup
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required variable is not set
    Missing(&'static str),
    /// A variable is set but cannot be parsed
    Invalid { key: &'static str, value: String },
    /// The staff recipient list is empty
    NoAdmins,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} is not set"),
            ConfigError::Invalid { key, value } => write!(f, "{key} has an invalid value: {value:?}"),
            ConfigError::NoAdmins => write!(f, "ADMIN_IDS must contain at least one id"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Process-wide bot configuration, immutable after startup
#[derive(Clone)]
pub struct BotConfig {
    /// Bot API token
    pub token: String,
    /// Bot handle without the leading `@`
    pub bot_username: String,
    /// Display name of the restaurant used in texts
    pub brand: String,
    /// Channel that receives the menu announcement
    pub channel: Recipient,
    /// Staff recipients of new orders; also the admin set
    pub admin_ids: Vec<ChatId>,
    /// Recipient of delivery failure reports
    pub main_admin_id: ChatId,
    /// Menu web app opened from the reply keyboard
    pub webapp_url: Url,
    /// Deep link that opens the menu from the channel post
    pub menu_deep_link: Url,
    /// Minimum interval between two accepted /start from one user
    pub start_cooldown: Duration,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("bot_username", &self.bot_username)
            .field("brand", &self.brand)
            .field("channel", &self.channel)
            .field("admin_ids", &self.admin_ids)
            .field("main_admin_id", &self.main_admin_id)
            .field("webapp_url", &self.webapp_url.as_str())
            .field("start_cooldown", &self.start_cooldown)
            .finish()
    }
}

impl BotConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = get("BOT_TOKEN")
            .or_else(|| get("TELEGRAM_BOT_TOKEN"))
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let bot_username = get("BOT_USERNAME")
            .map(|name| name.trim_start_matches('@').to_string())
            .unwrap_or_else(|| DEFAULT_BOT_USERNAME.to_string());

        let brand = get("BRAND_NAME").unwrap_or_else(|| DEFAULT_BRAND.to_string());

        let channel = parse_channel(&get("CHANNEL_ID").unwrap_or_else(|| DEFAULT_CHANNEL.to_string()));

        let admin_ids = match get("ADMIN_IDS") {
            Some(raw) => parse_id_list("ADMIN_IDS", &raw)?,
            None => DEFAULT_ADMIN_IDS.iter().copied().map(ChatId).collect(),
        };
        if admin_ids.is_empty() {
            return Err(ConfigError::NoAdmins);
        }

        let main_admin_id = match get("MAIN_ADMIN_ID") {
            Some(raw) => ChatId(parse_value("MAIN_ADMIN_ID", &raw)?),
            None => ChatId(DEFAULT_MAIN_ADMIN_ID),
        };

        let webapp_raw = get("WEBAPP_URL").unwrap_or_else(|| DEFAULT_WEBAPP_URL.to_string());
        let webapp_url = Url::parse(&webapp_raw).map_err(|_| ConfigError::Invalid {
            key: "WEBAPP_URL",
            value: webapp_raw.clone(),
        })?;

        let deep_link = format!("https://t.me/{bot_username}?startapp=menu");
        let menu_deep_link = Url::parse(&deep_link).map_err(|_| ConfigError::Invalid {
            key: "BOT_USERNAME",
            value: bot_username.clone(),
        })?;

        let cooldown_secs = match get("START_COOLDOWN_SECS") {
            Some(raw) => parse_value::<f64>("START_COOLDOWN_SECS", &raw)?,
            None => DEFAULT_START_COOLDOWN_SECS,
        };
        let start_cooldown = Duration::try_from_secs_f64(cooldown_secs).map_err(|_| {
            ConfigError::Invalid {
                key: "START_COOLDOWN_SECS",
                value: cooldown_secs.to_string(),
            }
        })?;

        Ok(Self {
            token,
            bot_username,
            brand,
            channel,
            admin_ids,
            main_admin_id,
            webapp_url,
            menu_deep_link,
            start_cooldown,
        })
    }

    /// Whether a user belongs to the admin set
    pub fn is_admin(&self, user_id: UserId) -> bool {
        let Ok(id) = i64::try_from(user_id.0) else {
            return false;
        };
        self.admin_ids.contains(&ChatId(id))
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

fn parse_id_list(key: &'static str, raw: &str) -> Result<Vec<ChatId>, ConfigError> {
    let mut ids: Vec<ChatId> = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = ChatId(parse_value(key, part)?);
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Numeric ids address a chat directly, anything else is a public `@username`
fn parse_channel(raw: &str) -> Recipient {
    match raw.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if raw.starts_with('@') => Recipient::ChannelUsername(raw.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{raw}")),
    }
}
