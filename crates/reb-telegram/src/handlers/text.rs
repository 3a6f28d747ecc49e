use reb_core::{conversation::Conversation, draft::FormEvent, i18n::TextKey, Result};

use super::{admin, posting, search, Ctx};

/// Free text goes to whatever the chat is waiting for.
pub(crate) async fn handle_text(ctx: &Ctx, text: &str) -> Result<()> {
    match ctx.state.conversations.get(ctx.chat_id).await {
        Some(Conversation::Posting(_)) => {
            posting::handle_event(ctx, FormEvent::Text(text.to_string())).await
        }
        Some(Conversation::AwaitingSearchQuery) => search::run_keyword(ctx, text).await,
        Some(Conversation::AwaitingRejectReason { listing_id }) => {
            admin::finish_reject(ctx, listing_id, text).await
        }
        None => ctx.show_main_menu(TextKey::MainMenu).await,
    }
}

/// Stickers, documents, voice and the like.
pub(crate) async fn handle_other(ctx: &Ctx) -> Result<()> {
    match ctx.state.conversations.get(ctx.chat_id).await {
        Some(_) => ctx.send(ctx.t(TextKey::UseButtons)).await.map(|_| ()),
        None => ctx.show_main_menu(TextKey::MainMenu).await,
    }
}
