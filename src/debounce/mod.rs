// Join-request gate: approve each requester at most once per debounce window,
// greet them, and remove the greeting after a delay.

mod greeting;
mod platform;
mod store;
mod sweeper;

pub use greeting::{DEFAULT_TEMPLATE, GreetingSettings, PendingGreeting};
pub use platform::{JoinRequestPlatform, PlatformError};
pub use store::{DebounceStore, Reservation};
pub use sweeper::StoreSweeper;

use std::sync::Arc;
use teloxide::types::{ChatId, UserId};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// An incoming request to join a gated chat.
#[derive(Clone, Debug)]
pub struct JoinRequest {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub display_name: String,
    /// Receipt time; `None` means "now" at evaluation.
    pub timestamp: Option<Instant>,
}

impl JoinRequest {
    pub fn new(user_id: UserId, chat_id: ChatId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            chat_id,
            display_name: display_name.into(),
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: Instant) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    fn validate(&self) -> Result<(), JoinError> {
        if self.user_id.0 == 0 {
            return Err(JoinError::InvalidRequest("requester id is empty"));
        }
        if self.chat_id.0 == 0 {
            return Err(JoinError::InvalidRequest("chat id is empty"));
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum JoinError {
    #[error("invalid join request: {0}")]
    InvalidRequest(&'static str),
    #[error("approval failed: {0}")]
    Approval(#[source] PlatformError),
}

#[derive(Debug)]
pub enum Outcome {
    /// Repeat request inside the debounce window; nothing was done.
    Suppressed,
    Approved,
    Failed(JoinError),
}

impl Outcome {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Outcome::Suppressed)
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Outcome::Approved)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

pub struct JoinRequestDebouncer<P> {
    platform: Arc<P>,
    store: Arc<DebounceStore>,
    greeting: Option<GreetingSettings>,
}

impl<P: JoinRequestPlatform> JoinRequestDebouncer<P> {
    /// `greeting = None` approves silently.
    pub fn new(platform: P, store: Arc<DebounceStore>, greeting: Option<GreetingSettings>) -> Self {
        Self {
            platform: Arc::new(platform),
            store,
            greeting,
        }
    }

    pub fn store(&self) -> &DebounceStore {
        &self.store
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub async fn handle(&self, event: JoinRequest) -> Outcome {
        if let Err(e) = event.validate() {
            warn!("Dropping join request: {e}");
            return Outcome::Failed(e);
        }

        let now = event.timestamp.unwrap_or_else(Instant::now);
        let Some(reservation) = self.store.try_reserve(event.user_id, now) else {
            info!("Ignoring repeated join request from user {}", event.user_id.0);
            return Outcome::Suppressed;
        };

        if let Err(e) = self
            .platform
            .approve_join_request(event.chat_id, event.user_id)
            .await
        {
            error!(
                "Failed to approve join request from user {} in chat {}: {e}",
                event.user_id.0, event.chat_id
            );
            reservation.rollback();
            return Outcome::Failed(JoinError::Approval(e));
        }
        reservation.commit(now);
        info!(
            "Approved join request from user {} in chat {}",
            event.user_id.0, event.chat_id
        );

        if let Some(greeting) = &self.greeting {
            self.greet(&event, greeting).await;
        }

        Outcome::Approved
    }

    async fn greet(&self, event: &JoinRequest, greeting: &GreetingSettings) {
        let text = greeting.render(&event.display_name);
        match self.platform.send_text(event.chat_id, text).await {
            Ok(message_id) => match Instant::now().checked_add(greeting.delete_after) {
                Some(delete_at) => PendingGreeting::new(event.chat_id, message_id, delete_at)
                    .schedule(Arc::clone(&self.platform)),
                None => warn!(
                    "Greeting {} in chat {} kept: delete delay of {:?} is out of range",
                    message_id.0, event.chat_id, greeting.delete_after
                ),
            },
            Err(e) => warn!(
                "Failed to send greeting to chat {} for user {}: {e}",
                event.chat_id, event.user_id.0
            ),
        }
    }
}
