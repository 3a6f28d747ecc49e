//! Telegram update handlers.
//!
//! Each handler is a small adapter that:
//! - checks the per-user rate limit and serializes work per chat
//! - turns the update into a form event, a search, or a moderation action
//! - renders the outcome through the throttled `MessagingPort`
//!
//! Handlers return `reb_core::Result`; errors stop here: they are logged and the user gets the
//! generic localized error text.

use std::{future::Future, sync::Arc};

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};

use reb_core::{
    conversation::Conversation,
    domain::{ChatId, Destination, Language, Listing, MessageId, MessageRef, Page, Paged, UserId},
    errors::Error,
    i18n::{self, TextKey},
    messaging::{
        callbacks::{CallbackAction, View},
        keyboards,
        types::{InlineKeyboard, Post},
    },
    security::RateDecision,
    Result,
};

use crate::router::AppState;

mod admin;
mod callback;
mod commands;
mod favorites;
mod my_postings;
pub(crate) mod photo;
mod posting;
mod search;
mod text;

/// Who is talking, where, and in which language.
#[derive(Clone)]
pub(crate) struct Ctx {
    pub state: Arc<AppState>,
    pub chat_id: ChatId,
    pub user: UserId,
    pub lang: Language,
}

impl Ctx {
    pub async fn new(state: Arc<AppState>, chat_id: ChatId, user: UserId) -> Self {
        let lang = state.language_of(user).await;
        Self {
            state,
            chat_id,
            user,
            lang,
        }
    }

    pub fn t(&self, key: TextKey) -> &'static str {
        i18n::text(self.lang, key)
    }

    pub fn is_moderator(&self) -> bool {
        self.state.gate.is_moderator(self.user)
    }

    pub async fn send(&self, html: &str) -> Result<MessageRef> {
        self.state.messenger.send_html(self.chat_id, html).await
    }

    pub async fn send_keyboard(&self, html: &str, keyboard: InlineKeyboard) -> Result<MessageRef> {
        self.state
            .messenger
            .send_inline_keyboard(self.chat_id, html, keyboard)
            .await
    }

    /// Edit `msg` in place; a message that can no longer be edited gets a fresh one instead.
    pub async fn replace(&self, msg: MessageRef, html: &str, keyboard: InlineKeyboard) -> Result<()> {
        match self
            .state
            .messenger
            .edit_inline_keyboard(msg, html, keyboard.clone())
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::debug!(chat_id = self.chat_id.0, error = %e, "edit failed, sending new message");
                self.send_keyboard(html, keyboard).await.map(|_| ())
            }
        }
    }

    pub async fn show_main_menu(&self, key: TextKey) -> Result<()> {
        self.send_keyboard(self.t(key), keyboards::main_menu(self.lang, self.is_moderator()))
            .await
            .map(|_| ())
    }

    /// Leave whatever flow the chat was in, dropping photos that are still being collected
    /// and the search being paged through.
    pub async fn reset(&self) -> Option<Conversation> {
        self.state.collector.discard_owner(self.chat_id).await;
        self.state.searches.forget(self.chat_id).await;
        self.state.conversations.clear(self.chat_id).await
    }
}

/// One listing in a paginated view.
pub(crate) struct Card {
    pub text: String,
    pub photo: Option<String>,
    pub keyboard: InlineKeyboard,
}

impl Card {
    pub fn new(text: String, listing: &Listing, keyboard: InlineKeyboard) -> Self {
        Self {
            text,
            photo: listing.photo_file_ids.first().cloned(),
            keyboard,
        }
    }
}

/// Fetch `page`; a page that emptied out (deletions since the last view) falls back to the last one.
pub(crate) async fn fetch_page<F, Fut>(page: u32, size: u32, fetch: F) -> Result<Paged<Listing>>
where
    F: Fn(Page) -> Fut,
    Fut: Future<Output = Result<Paged<Listing>>>,
{
    let paged = fetch(Page::new(page, size)).await?;
    let last = paged.total_pages();
    if paged.items.is_empty() && last > 0 && last < page {
        return fetch(Page::new(last, size)).await;
    }
    Ok(paged)
}

/// Header, one message per card, then the pager.
pub(crate) async fn send_page(
    ctx: &Ctx,
    header: &str,
    cards: Vec<Card>,
    view: View,
    page: u32,
    total_pages: u32,
) -> Result<()> {
    ctx.send(header).await?;
    let dest = Destination::Chat(ctx.chat_id);
    for card in cards {
        let photos: Vec<String> = card.photo.into_iter().collect();
        let post = Post::new(card.text, &photos, 1).with_keyboard(card.keyboard);
        ctx.state.messenger.post(&dest, &post).await?;
    }
    let (current, total) = (page.to_string(), total_pages.max(1).to_string());
    let footer = i18n::format(
        ctx.lang,
        TextKey::PageInfo,
        &[("current", current.as_str()), ("total", total.as_str())],
    );
    ctx.send_keyboard(
        &footer,
        keyboards::pagination(ctx.lang, view, page, total_pages),
    )
    .await
    .map(|_| ())
}

/// User-facing text for an error that reached a handler boundary.
pub(crate) fn error_text(lang: Language, err: &Error) -> &'static str {
    let key = match err {
        Error::Forbidden(_) => TextKey::NotAllowed,
        Error::NotFound(_) => TextKey::ListingNotFound,
        Error::InvalidTransition(_) => TextKey::AlreadyReviewed,
        Error::Validation(_) => TextKey::ReasonRequired,
        _ => TextKey::GenericError,
    };
    i18n::text(lang, key)
}

async fn report(ctx: &Ctx, what: &str, err: &Error) {
    tracing::error!(chat_id = ctx.chat_id.0, user = ctx.user.0, error = %err, "{what} failed");
    if let Err(e) = ctx.send(error_text(ctx.lang, err)).await {
        tracing::warn!(chat_id = ctx.chat_id.0, error = %e, "failed to send error notice");
    }
}

async fn rate_check(state: &AppState, user: UserId) -> RateDecision {
    let decision = state.rate_limiter.lock().await.check(user);
    if !decision.is_allowed() {
        tracing::info!(user = user.0, retry_after = decision.retry_after_secs(), "rate limited");
    }
    decision
}

fn rate_limited_text(lang: Language, decision: RateDecision) -> String {
    let seconds = decision.retry_after_secs().to_string();
    i18n::format(lang, TextKey::RateLimited, &[("seconds", seconds.as_str())])
}

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let cb_id = q.id.clone();
    let user = UserId(q.from.id.0 as i64);
    let data = q.data.clone().unwrap_or_default();

    let Some(message) = q.message.as_ref() else {
        let _ = state.messenger.answer_callback_query(&cb_id, None, false).await;
        return Ok(());
    };
    let msg = MessageRef {
        chat_id: ChatId(message.chat.id.0),
        message_id: MessageId(message.id.0),
    };

    let decision = rate_check(&state, user).await;
    if !decision.is_allowed() {
        let lang = state.language_of(user).await;
        let text = rate_limited_text(lang, decision);
        let _ = state
            .messenger
            .answer_callback_query(&cb_id, Some(&text), true)
            .await;
        return Ok(());
    }

    let Some(action) = CallbackAction::parse(&data) else {
        tracing::debug!(user = user.0, data = %data, "unknown callback data");
        let _ = state.messenger.answer_callback_query(&cb_id, None, false).await;
        return Ok(());
    };

    let _guard = state.chat_locks.lock_chat(msg.chat_id.0).await;
    let ctx = Ctx::new(state.clone(), msg.chat_id, user).await;

    let answer = match callback::dispatch(&ctx, msg, action).await {
        Ok(answer) => answer,
        Err(e) => {
            report(&ctx, "callback", &e).await;
            callback::Answer::none()
        }
    };
    if let Err(e) = state
        .messenger
        .answer_callback_query(&cb_id, answer.text.as_deref(), answer.alert)
        .await
    {
        tracing::debug!(error = %e, "answer_callback_query failed");
    }
    Ok(())
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(from) = msg.from() else {
        return Ok(());
    };
    let user = UserId(from.id.0 as i64);
    let chat_id = ChatId(msg.chat.id.0);

    // Album items arrive as a burst; only the collector sees them individually.
    let in_album = msg.media_group_id().is_some();
    if !in_album {
        let decision = rate_check(&state, user).await;
        if !decision.is_allowed() {
            let lang = state.language_of(user).await;
            let _ = state
                .messenger
                .send_html(chat_id, &rate_limited_text(lang, decision))
                .await;
            return Ok(());
        }
    }

    let _guard = state.chat_locks.lock_chat(chat_id.0).await;
    let ctx = Ctx::new(state.clone(), chat_id, user).await;

    let result = if let Some(text) = msg.text() {
        if text.starts_with('/') {
            commands::handle_command(&ctx, &msg, text).await
        } else {
            text::handle_text(&ctx, text).await
        }
    } else if msg.photo().is_some() {
        photo::handle_photo(&ctx, &msg).await
    } else {
        text::handle_other(&ctx).await
    };

    if let Err(e) = result {
        report(&ctx, "message", &e).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn errors_map_to_localized_notices() {
        let lang = Language::Uz;
        assert_eq!(
            error_text(lang, &Error::Forbidden("x".into())),
            i18n::text(lang, TextKey::NotAllowed)
        );
        assert_eq!(
            error_text(lang, &Error::InvalidTransition("x".into())),
            i18n::text(lang, TextKey::AlreadyReviewed)
        );
        assert_eq!(
            error_text(lang, &Error::Storage("db down".into())),
            i18n::text(lang, TextKey::GenericError)
        );
    }

    #[test]
    fn rate_limit_notice_rounds_up() {
        let text = rate_limited_text(
            Language::En,
            RateDecision::Limited {
                retry_after: Duration::from_millis(2100),
            },
        );
        assert!(text.contains('3'), "{text}");
        assert!(!text.contains("{seconds}"));
    }
}
