use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageId, MessageRef},
    messaging::types::{GroupPhoto, InlineKeyboard, Outgoing, PhotoPayload, VideoPayload},
    Result,
};

/// Outbound chat transport.
///
/// Captions and text are Telegram HTML. Every send returns the id of the sent
/// message so the caller can thread the next one as a reply to it.
#[async_trait]
pub trait TransportPort: Send + Sync {
    async fn send_video(
        &self,
        chat_id: ChatId,
        video: VideoPayload,
        out: Outgoing,
    ) -> Result<MessageId>;

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: PhotoPayload,
        out: Outgoing,
    ) -> Result<MessageId>;

    /// Sends an album and returns the id of its first message.
    async fn send_photo_group(
        &self,
        chat_id: ChatId,
        photos: Vec<GroupPhoto>,
        out: Outgoing,
    ) -> Result<MessageId>;

    async fn send_text(&self, chat_id: ChatId, html: &str, out: Outgoing) -> Result<MessageId>;

    async fn delete_message(&self, msg: MessageRef) -> Result<()>;

    /// Replaces the message keyboard; `None` removes it.
    async fn edit_keyboard(&self, msg: MessageRef, keyboard: Option<InlineKeyboard>)
        -> Result<()>;

    async fn send_typing(&self, chat_id: ChatId) -> Result<()>;
}
