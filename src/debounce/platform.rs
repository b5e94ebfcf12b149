// The slice of the Telegram Bot API the join-request flow depends on.

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{MessageId, UserId},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error(transparent)]
    Request(#[from] teloxide::RequestError),
    #[error("platform rejected the call: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait JoinRequestPlatform: Send + Sync + 'static {
    async fn approve_join_request(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> Result<(), PlatformError>;

    /// Post `text` to `chat_id` and return the id of the sent message.
    async fn send_text(&self, chat_id: ChatId, text: String) -> Result<MessageId, PlatformError>;

    async fn retract_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), PlatformError>;
}

#[async_trait]
impl JoinRequestPlatform for Bot {
    async fn approve_join_request(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> Result<(), PlatformError> {
        self.approve_chat_join_request(chat_id, user_id).await?;
        Ok(())
    }

    async fn send_text(&self, chat_id: ChatId, text: String) -> Result<MessageId, PlatformError> {
        let sent = self.send_message(chat_id, text).await?;
        Ok(sent.id)
    }

    async fn retract_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), PlatformError> {
        self.delete_message(chat_id, message_id).await?;
        Ok(())
    }
}
