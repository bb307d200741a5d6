//! # Messenger Module
//!
//! The outbound side of the chat platform as seen by the rest of the crate:
//! send a text message (optionally with a keyboard) and pin a message.
//! The teloxide [`Bot`] implementation converts request errors into
//! [`DeliveryError`] kinds.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode, Recipient, ReplyMarkup};
use teloxide::{ApiError, RequestError};

use crate::delivery_errors::DeliveryError;

/// Outbound messaging operations used by handlers and the fan-out dispatcher.
///
/// Every call is a single attempt. Messages are sent with HTML formatting.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send an HTML text message, returning the id of the sent message
    async fn send_text(
        &self,
        to: Recipient,
        text: String,
        markup: Option<ReplyMarkup>,
    ) -> Result<MessageId, DeliveryError>;

    /// Pin a message without notifying chat members
    async fn pin(&self, chat: Recipient, message_id: MessageId) -> Result<(), DeliveryError>;
}

#[async_trait]
impl Messenger for Bot {
    async fn send_text(
        &self,
        to: Recipient,
        text: String,
        markup: Option<ReplyMarkup>,
    ) -> Result<MessageId, DeliveryError> {
        let mut request = self.send_message(to, text).parse_mode(ParseMode::Html);
        if let Some(markup) = markup {
            request = request.reply_markup(markup);
        }

        request
            .await
            .map(|message| message.id)
            .map_err(|e| classify_request_error(&e))
    }

    async fn pin(&self, chat: Recipient, message_id: MessageId) -> Result<(), DeliveryError> {
        self.pin_chat_message(chat, message_id)
            .disable_notification(true)
            .await
            .map(|_| ())
            .map_err(|e| classify_request_error(&e))
    }
}

/// Map a teloxide request error onto a delivery error kind
pub fn classify_request_error(err: &RequestError) -> DeliveryError {
    match err {
        RequestError::Api(api_err) => classify_api_error(api_err),
        other => DeliveryError::other(other.to_string()),
    }
}

fn classify_api_error(api_err: &ApiError) -> DeliveryError {
    let description = api_err.to_string();

    match api_err {
        ApiError::BotBlocked
        | ApiError::BotKicked
        | ApiError::BotKickedFromSupergroup
        | ApiError::UserDeactivated
        | ApiError::CantInitiateConversation
        | ApiError::CantTalkWithBots => DeliveryError::unreachable(description),

        ApiError::ChatNotFound | ApiError::UserNotFound => DeliveryError::not_found(description),

        ApiError::MessageIsTooLong
        | ApiError::MessageTextIsEmpty
        | ApiError::CantParseEntities(_)
        | ApiError::ButtonUrlInvalid
        | ApiError::NotEnoughRightsToPinMessage
        | ApiError::NotEnoughRightsToManagePins
        | ApiError::NotEnoughRightsToPostMessages => DeliveryError::malformed(description),

        ApiError::Unknown(raw) => classify_raw_description(raw),

        _ => DeliveryError::other(description),
    }
}

/// Classify an API error teloxide does not know by its Telegram description prefix
pub fn classify_raw_description(raw: &str) -> DeliveryError {
    let lowered = raw.to_lowercase();

    if lowered.starts_with("forbidden") {
        DeliveryError::unreachable(raw)
    } else if lowered.contains("not found") {
        DeliveryError::not_found(raw)
    } else if lowered.starts_with("bad request") {
        DeliveryError::malformed(raw)
    } else {
        DeliveryError::other(raw)
    }
}
