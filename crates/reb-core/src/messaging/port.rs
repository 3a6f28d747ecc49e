use async_trait::async_trait;

use crate::{
    domain::{ChatId, Destination, MessageRef},
    messaging::types::{InlineKeyboard, MessagingCapabilities, Post},
    Result,
};

/// Outbound messaging port.
///
/// Implemented over the Telegram Bot API in the adapter crate; the moderation gate and the
/// handlers only see this trait.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef>;

    async fn send_inline_keyboard(
        &self,
        chat_id: ChatId,
        html: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef>;

    async fn edit_html(&self, msg: MessageRef, html: &str) -> Result<()>;

    /// Replace text and buttons of a message sent earlier.
    async fn edit_inline_keyboard(
        &self,
        msg: MessageRef,
        html: &str,
        keyboard: InlineKeyboard,
    ) -> Result<()>;

    async fn delete_message(&self, msg: MessageRef) -> Result<()>;

    /// Publish a text/photo/album post. Returns the messages that were created.
    async fn post(&self, dest: &Destination, post: &Post) -> Result<Vec<MessageRef>>;

    async fn answer_callback_query(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()>;
}
