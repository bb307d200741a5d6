//! Shared test helpers: a recording messenger and a ready-made bot context.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;
use teloxide::types::{ChatId, MessageId, Recipient, ReplyMarkup, UserId};

use orzu_dil_bot::bot::{AppContext, Caller};
use orzu_dil_bot::config::BotConfig;
use orzu_dil_bot::delivery_errors::DeliveryError;
use orzu_dil_bot::messenger::Messenger;

pub const MAIN_ADMIN: ChatId = ChatId(1);
pub const STAFF: [ChatId; 3] = [ChatId(1), ChatId(2), ChatId(3)];
pub const CUSTOMER: ChatId = ChatId(500);

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub to: Recipient,
    pub text: String,
    pub has_markup: bool,
}

/// Messenger fake that records delivered messages and fails on demand
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<SentMessage>>,
    attempts: Mutex<Vec<Recipient>>,
    pinned: Mutex<Vec<(Recipient, MessageId)>>,
    failing: Vec<(Recipient, DeliveryError)>,
    pin_error: Option<DeliveryError>,
    next_id: AtomicI32,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send to `to` fails with `err`
    pub fn failing_for(mut self, to: impl Into<Recipient>, err: DeliveryError) -> Self {
        self.failing.push((to.into(), err));
        self
    }

    /// Every pin fails with `err`
    pub fn failing_pin(mut self, err: DeliveryError) -> Self {
        self.pin_error = Some(err);
        self
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, to: impl Into<Recipient>) -> Vec<SentMessage> {
        let to = to.into();
        self.sent().into_iter().filter(|m| m.to == to).collect()
    }

    pub fn attempts(&self) -> Vec<Recipient> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn pinned(&self) -> Vec<(Recipient, MessageId)> {
        self.pinned.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(
        &self,
        to: Recipient,
        text: String,
        markup: Option<ReplyMarkup>,
    ) -> Result<MessageId, DeliveryError> {
        self.attempts.lock().unwrap().push(to.clone());

        if let Some((_, err)) = self.failing.iter().find(|(r, _)| *r == to) {
            return Err(err.clone());
        }

        self.sent.lock().unwrap().push(SentMessage {
            to,
            text,
            has_markup: markup.is_some(),
        });
        Ok(MessageId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn pin(&self, chat: Recipient, message_id: MessageId) -> Result<(), DeliveryError> {
        if let Some(err) = &self.pin_error {
            return Err(err.clone());
        }
        self.pinned.lock().unwrap().push((chat, message_id));
        Ok(())
    }
}

pub fn test_config() -> BotConfig {
    BotConfig::from_lookup(|key| match key {
        "BOT_TOKEN" => Some("123456:test-token".to_string()),
        "ADMIN_IDS" => Some("1,2,3".to_string()),
        "MAIN_ADMIN_ID" => Some("1".to_string()),
        "CHANNEL_ID" => Some("@orzu_test_channel".to_string()),
        _ => None,
    })
    .expect("test configuration should be valid")
}

pub fn test_context() -> AppContext {
    AppContext::new(test_config())
}

pub fn customer() -> Caller {
    Caller {
        user_id: UserId(500),
        chat_id: CUSTOMER,
        username: Some("dilnoza".to_string()),
        full_name: "Dilnoza Karimova".to_string(),
    }
}

pub fn admin() -> Caller {
    Caller {
        user_id: UserId(2),
        chat_id: ChatId(2),
        username: None,
        full_name: "Kitchen Manager".to_string(),
    }
}

pub fn channel() -> Recipient {
    Recipient::ChannelUsername("@orzu_test_channel".to_string())
}
