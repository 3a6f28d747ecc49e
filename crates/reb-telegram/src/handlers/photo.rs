use std::sync::Arc;

use teloxide::types::Message;

use reb_core::{
    collector::{Batch, Submission},
    conversation::Conversation,
    domain::UserId,
    draft::FormEvent,
    Result,
};

use crate::router::AppState;

use super::{posting, report, Ctx};

/// Largest size Telegram offers for the photo.
fn best_file_id(msg: &Message) -> Option<String> {
    msg.photo()?.last().map(|p| p.file.id.clone())
}

pub(crate) async fn handle_photo(ctx: &Ctx, msg: &Message) -> Result<()> {
    let Some(file_id) = best_file_id(msg) else {
        return Ok(());
    };
    if !matches!(
        ctx.state.conversations.get(ctx.chat_id).await,
        Some(Conversation::Posting(_))
    ) {
        tracing::debug!(chat_id = ctx.chat_id.0, "photo outside of a posting, ignored");
        return Ok(());
    }

    let group_id = msg.media_group_id().map(str::to_string);
    match ctx.state.collector.submit(ctx.chat_id, file_id, group_id).await {
        Submission::Immediate(file_id) => {
            posting::handle_event(
                ctx,
                FormEvent::PhotosAppended {
                    file_ids: vec![file_id],
                    batched: false,
                },
            )
            .await
        }
        Submission::Buffered { .. } => Ok(()),
    }
}

/// Apply a media group whose debounce window passed. Runs outside the dispatcher, so it takes
/// the chat lock itself.
pub(crate) async fn apply_batch(state: Arc<AppState>, batch: Batch<String>) {
    let _guard = state.chat_locks.lock_chat(batch.owner.0).await;
    // Forms only run in private chats, where the chat id is the user id.
    let ctx = Ctx::new(state.clone(), batch.owner, UserId(batch.owner.0)).await;
    let items = batch.items.len();

    if !matches!(
        state.conversations.get(batch.owner).await,
        Some(Conversation::Posting(_))
    ) {
        tracing::info!(chat_id = batch.owner.0, items, "media group arrived after the form ended");
        return;
    }

    let event = FormEvent::PhotosAppended {
        file_ids: batch.items,
        batched: true,
    };
    if let Err(e) = posting::handle_event(&ctx, event).await {
        report(&ctx, "media group", &e).await;
    }
}
