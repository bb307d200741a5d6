//! # Start Rate Limiter Module
//!
//! Debounces repeated /start triggers from the same user. Telegram clients
//! often deliver a second /start when the menu button is tapped, so a trigger
//! arriving within the window of the previous accepted one is dropped.

use std::collections::HashMap;
use std::time::Duration;
use teloxide::types::UserId;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default minimum interval between two accepted triggers
pub const DEFAULT_START_WINDOW: Duration = Duration::from_secs(2);

/// Per-user debounce store
///
/// Keeps the time of the last accepted trigger for every user. Entries are
/// overwritten on each accepted trigger and never evicted.
#[derive(Debug)]
pub struct StartLimiter {
    window: Duration,
    last_start: Mutex<HashMap<UserId, Instant>>,
}

impl Default for StartLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_START_WINDOW)
    }
}

impl StartLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_start: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Check whether a trigger from `user_id` is allowed now and record it if so
    pub async fn allow(&self, user_id: UserId) -> bool {
        self.allow_at(user_id, Instant::now()).await
    }

    /// Same as [`allow`](Self::allow) with an explicit clock reading
    pub async fn allow_at(&self, user_id: UserId, now: Instant) -> bool {
        let mut last_start = self.last_start.lock().await;

        if let Some(previous) = last_start.get(&user_id) {
            if now.saturating_duration_since(*previous) < self.window {
                return false;
            }
        }

        last_start.insert(user_id, now);
        true
    }

    /// Time of the last accepted trigger for a user
    pub async fn last_accepted(&self, user_id: UserId) -> Option<Instant> {
        self.last_start.lock().await.get(&user_id).copied()
    }
}
