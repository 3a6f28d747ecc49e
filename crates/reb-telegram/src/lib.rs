//! Telegram adapter (teloxide).
//!
//! This crate implements the `reb-core` MessagingPort over the Telegram Bot API and wires the
//! update handlers into a long-polling dispatcher.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{
        InlineKeyboardButton, InlineKeyboardMarkup, InputFile, InputMedia, InputMediaPhoto,
        ParseMode, Recipient,
    },
};

use tokio::time::sleep;

pub mod handlers;
pub mod router;

use reb_core::{
    domain::{ChatId, Destination, MessageId, MessageRef},
    errors::Error,
    formatting::split_html,
    messaging::{
        port::MessagingPort,
        types::{InlineKeyboard, MessagingCapabilities, Post},
    },
    Result,
};

/// Sent under an album: media groups cannot carry inline buttons themselves.
const ALBUM_KEYBOARD_TEXT: &str = "👆";

const MAX_MESSAGE_LEN: usize = 4096;
const MAX_CAPTION_LEN: usize = 1024;
const MAX_ALBUM_SIZE: usize = 10;

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn recipient(dest: &Destination) -> Recipient {
        match dest {
            Destination::Chat(chat_id) => Recipient::Id(Self::tg_chat(*chat_id)),
            Destination::Channel(username) => Recipient::ChannelUsername(username.clone()),
        }
    }

    fn message_ref(msg: &Message) -> MessageRef {
        MessageRef {
            chat_id: ChatId(msg.chat.id.0),
            message_id: MessageId(msg.id.0),
        }
    }

    fn markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
            row.iter()
                .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.callback_data.clone()))
                .collect::<Vec<_>>()
        }))
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        tracing::warn!(retry_after = ?d, "telegram flood limit hit, retrying");
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }

    async fn send_text(
        &self,
        to: &Recipient,
        html: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message> {
        self.with_retry(|| {
            let mut req = self
                .bot
                .send_message(to.clone(), html.to_string())
                .parse_mode(ParseMode::Html);
            if let Some(m) = markup {
                req = req.reply_markup(m.clone());
            }
            req
        })
        .await
    }

    /// Text over the message limit goes out in several messages; the keyboard rides on the
    /// last one, which is also the one returned.
    async fn send_long(
        &self,
        to: &Recipient,
        html: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message> {
        let pieces = message_pieces(html);
        let last = pieces.len().saturating_sub(1);
        let mut sent = None;
        for (i, piece) in pieces.iter().enumerate() {
            let piece_markup = if i == last { markup } else { None };
            sent = Some(self.send_text(to, piece, piece_markup).await?);
        }
        if pieces.len() > 1 {
            tracing::debug!(pieces = pieces.len(), "long message split");
        }
        sent.ok_or_else(|| Error::Validation("empty message".to_string()))
    }

    async fn send_single_photo(
        &self,
        to: &Recipient,
        file_id: &str,
        caption: Option<&str>,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message> {
        self.with_retry(|| {
            let mut req = self
                .bot
                .send_photo(to.clone(), InputFile::file_id(file_id.to_string()));
            if let Some(c) = caption {
                req = req.caption(c.to_string()).parse_mode(ParseMode::Html);
            }
            if let Some(m) = markup {
                req = req.reply_markup(m.clone());
            }
            req
        })
        .await
    }

    async fn send_album(
        &self,
        to: &Recipient,
        photos: &[String],
        caption: Option<&str>,
    ) -> Result<Vec<Message>> {
        let media: Vec<InputMedia> = photos
            .iter()
            .enumerate()
            .map(|(i, file_id)| {
                let photo = InputMediaPhoto::new(InputFile::file_id(file_id.clone()));
                // The album caption lives on its first item.
                let photo = match caption {
                    Some(c) if i == 0 => photo.caption(c.to_string()).parse_mode(ParseMode::Html),
                    _ => photo,
                };
                InputMedia::Photo(photo)
            })
            .collect();

        self.with_retry(|| self.bot.send_media_group(to.clone(), media.clone()))
            .await
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            supports_html: true,
            supports_edit: true,
            max_message_len: MAX_MESSAGE_LEN,
            max_caption_len: MAX_CAPTION_LEN,
            max_album_size: MAX_ALBUM_SIZE,
        }
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        let msg = self
            .send_long(&Recipient::Id(Self::tg_chat(chat_id)), html, None)
            .await?;
        Ok(Self::message_ref(&msg))
    }

    async fn send_inline_keyboard(
        &self,
        chat_id: ChatId,
        html: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef> {
        let markup = Self::markup(&keyboard);
        let msg = self
            .send_long(&Recipient::Id(Self::tg_chat(chat_id)), html, Some(&markup))
            .await?;
        Ok(Self::message_ref(&msg))
    }

    async fn edit_html(&self, msg: MessageRef, html: &str) -> Result<()> {
        self.with_retry(|| {
            self.bot
                .edit_message_text(
                    Self::tg_chat(msg.chat_id),
                    Self::tg_msg_id(msg.message_id),
                    html.to_string(),
                )
                .parse_mode(ParseMode::Html)
        })
        .await?;
        Ok(())
    }

    async fn edit_inline_keyboard(
        &self,
        msg: MessageRef,
        html: &str,
        keyboard: InlineKeyboard,
    ) -> Result<()> {
        let markup = Self::markup(&keyboard);
        self.with_retry(|| {
            self.bot
                .edit_message_text(
                    Self::tg_chat(msg.chat_id),
                    Self::tg_msg_id(msg.message_id),
                    html.to_string(),
                )
                .parse_mode(ParseMode::Html)
                .reply_markup(markup.clone())
        })
        .await?;
        Ok(())
    }

    async fn delete_message(&self, msg: MessageRef) -> Result<()> {
        self.with_retry(|| {
            self.bot
                .delete_message(Self::tg_chat(msg.chat_id), Self::tg_msg_id(msg.message_id))
        })
        .await?;
        Ok(())
    }

    async fn post(&self, dest: &Destination, post: &Post) -> Result<Vec<MessageRef>> {
        let to = Self::recipient(dest);
        let caps = self.capabilities();
        let markup = post.keyboard.as_ref().map(Self::markup);
        let photos: Vec<String> = post.photos.iter().take(caps.max_album_size).cloned().collect();
        // Too long for a caption: photos go bare and the text follows as its own message.
        let fits_caption = post.text.chars().count() <= caps.max_caption_len;
        let caption = fits_caption.then_some(post.text.as_str());

        let mut sent = Vec::new();
        match photos.as_slice() {
            [] => {
                let msg = self.send_long(&to, &post.text, markup.as_ref()).await?;
                sent.push(Self::message_ref(&msg));
                return Ok(sent);
            }
            [single] => {
                let inline_markup = if fits_caption { markup.as_ref() } else { None };
                let msg = self
                    .send_single_photo(&to, single, caption, inline_markup)
                    .await?;
                sent.push(Self::message_ref(&msg));
                if fits_caption {
                    return Ok(sent);
                }
            }
            many => {
                let msgs = self.send_album(&to, many, caption).await?;
                sent.extend(msgs.iter().map(Self::message_ref));
            }
        }

        if !fits_caption {
            let msg = self.send_long(&to, &post.text, markup.as_ref()).await?;
            sent.push(Self::message_ref(&msg));
        } else if let Some(m) = markup.as_ref() {
            let msg = self.send_text(&to, ALBUM_KEYBOARD_TEXT, Some(m)).await?;
            sent.push(Self::message_ref(&msg));
        }

        tracing::debug!(destination = %dest, photos = photos.len(), messages = sent.len(), "post delivered");
        Ok(sent)
    }

    async fn answer_callback_query(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()> {
        self.with_retry(|| {
            let mut req = self.bot.answer_callback_query(callback_id.to_string());
            if let Some(t) = text {
                req = req.text(t.to_string());
            }
            if show_alert {
                req = req.show_alert(true);
            }
            req
        })
        .await?;
        Ok(())
    }
}

/// `html` cut to what one Telegram message can hold.
fn message_pieces(html: &str) -> Vec<String> {
    split_html(html, MAX_MESSAGE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reb_core::{
        domain::{DealStatus, PropertyType},
        listing::{channel_text, ChannelPost},
        messaging::types::InlineButton,
    };

    #[test]
    fn long_listing_text_fits_telegram_messages() {
        let description = "Yevro remont, 3 xona, 2-qavat\n".repeat(170);
        assert!(description.chars().count() > 5000);
        let text = channel_text(ChannelPost {
            description: &description,
            contact_info: "+998901234567",
            full_address: "Chilonzor, Toshkent shahri",
            property_type: PropertyType::Apartment,
            status: DealStatus::Sale,
            is_makler: false,
        });

        let pieces = message_pieces(&text);
        assert_eq!(pieces.len(), 2);
        assert!(pieces.iter().all(|p| p.chars().count() <= MAX_MESSAGE_LEN));
        // Every break lands on a newline, so nothing but those newlines is lost.
        assert_eq!(pieces.join("\n"), text);
        assert!(pieces[1].ends_with("#apartment #sale #maklersiz"));
    }

    #[test]
    fn short_text_is_sent_as_is() {
        assert_eq!(message_pieces("<b>Salom</b>"), vec!["<b>Salom</b>".to_string()]);
    }

    #[test]
    fn keyboard_rows_survive_conversion() {
        let kb = InlineKeyboard::new()
            .row(vec![
                InlineButton::new("a", "x:1"),
                InlineButton::new("b", "x:2"),
            ])
            .button(InlineButton::new("c", "x:3"));
        let markup = TelegramMessenger::markup(&kb);
        let sizes: Vec<usize> = markup.inline_keyboard.iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![2, 1]);
        assert_eq!(markup.inline_keyboard[1][0].text, "c");
    }

    #[test]
    fn destinations_map_to_recipients() {
        assert_eq!(
            TelegramMessenger::recipient(&Destination::Chat(ChatId(-100123))),
            Recipient::Id(teloxide::types::ChatId(-100123))
        );
        assert_eq!(
            TelegramMessenger::recipient(&Destination::Channel("@uy_joy".into())),
            Recipient::ChannelUsername("@uy_joy".into())
        );
    }
}
