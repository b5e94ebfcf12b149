// Welcome message text and its deferred removal.

use super::platform::JoinRequestPlatform;
use std::sync::Arc;
use teloxide::types::{ChatId, MessageId};
use tokio::time::{Duration, Instant, sleep_until};
use tracing::{debug, warn};

pub const DEFAULT_TEMPLATE: &str = "Hi {name}, Welcome to our Channel...";

#[derive(Clone, Debug)]
pub struct GreetingSettings {
    /// Message text; `{name}` is replaced by the requester's display name.
    pub template: String,
    pub delete_after: Duration,
}

impl GreetingSettings {
    pub fn new(template: impl Into<String>, delete_after: Duration) -> Self {
        Self {
            template: template.into(),
            delete_after,
        }
    }

    pub fn render(&self, name: &str) -> String {
        self.template.replace("{name}", name)
    }
}

impl Default for GreetingSettings {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE, Duration::from_secs(10))
    }
}

/// A sent greeting waiting to be deleted.
#[derive(Debug)]
pub struct PendingGreeting {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub delete_at: Instant,
}

impl PendingGreeting {
    pub fn new(chat_id: ChatId, message_id: MessageId, delete_at: Instant) -> Self {
        Self {
            chat_id,
            message_id,
            delete_at,
        }
    }

    // Hands ownership to a detached task. The delete is attempted exactly once
    // and is lost if the runtime shuts down first.
    pub fn schedule<P: JoinRequestPlatform>(self, platform: Arc<P>) {
        tokio::spawn(async move {
            sleep_until(self.delete_at).await;
            match platform
                .retract_message(self.chat_id, self.message_id)
                .await
            {
                Ok(()) => debug!(
                    "Deleted greeting {} in chat {}",
                    self.message_id.0, self.chat_id
                ),
                Err(e) => warn!("Failed to delete message: {e}"),
            }
        });
    }
}
