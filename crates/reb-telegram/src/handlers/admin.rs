//! Moderator actions. Replies go to the moderator's private chat, since review buttons may
//! live in the admin channel.

use reb_core::{
    conversation::Conversation,
    domain::{ChatId, ListingId, MessageRef},
    errors::Error,
    i18n::{self, TextKey},
    listing::admin_review_text,
    messaging::{callbacks::View, keyboards},
    Result,
};

use super::{callback::Answer, send_page, Card, Ctx};

fn direct(ctx: &Ctx) -> Ctx {
    Ctx {
        chat_id: ChatId::from(ctx.user),
        ..ctx.clone()
    }
}

async fn panel_text(ctx: &Ctx) -> Result<String> {
    let pending = ctx.state.store.count_pending().await?.to_string();
    Ok(i18n::format(
        ctx.lang,
        TextKey::AdminPanel,
        &[("pending", pending.as_str())],
    ))
}

/// Pending count plus the button to review them. `msg` is edited when the panel was opened
/// from a menu.
pub(crate) async fn panel(ctx: &Ctx, msg: Option<MessageRef>) -> Result<()> {
    if !ctx.is_moderator() {
        return ctx.send(ctx.t(TextKey::AdminOnly)).await.map(|_| ());
    }
    let text = panel_text(ctx).await?;
    let keyboard = keyboards::admin_panel(ctx.lang);
    match msg {
        Some(msg) => ctx.replace(msg, &text, keyboard).await,
        None => ctx.send_keyboard(&text, keyboard).await.map(|_| ()),
    }
}

/// Pending listings, oldest first, each with approve / reject buttons.
pub(crate) async fn show_pending(ctx: &Ctx, page: u32) -> Result<()> {
    if !ctx.is_moderator() {
        return ctx.send(ctx.t(TextKey::AdminOnly)).await.map(|_| ());
    }
    let store = &ctx.state.store;
    let size = ctx.state.cfg.search_results_per_page;
    let total = store.count_pending().await?;
    if total == 0 {
        return ctx
            .send_keyboard(ctx.t(TextKey::NoPendingListings), keyboards::admin_panel(ctx.lang))
            .await
            .map(|_| ());
    }

    let (page, total_pages) = clamp_page(page, size, total);
    let skip = ((page - 1) * size) as usize;
    let listings = store.pending_listings(i64::from(page * size)).await?;
    let cards = listings
        .iter()
        .skip(skip)
        .map(|l| {
            Card::new(
                admin_review_text(l),
                l,
                keyboards::approval(ctx.lang, l.id),
            )
        })
        .collect();

    let header = panel_text(ctx).await?;
    send_page(ctx, &header, cards, View::Pending, page, total_pages).await
}

/// The requested page limited to the pages that exist, with the page count.
fn clamp_page(page: u32, size: u32, total: i64) -> (u32, u32) {
    let size = i64::from(size.max(1));
    let total_pages = ((total.max(0) + size - 1) / size).max(1) as u32;
    (page.clamp(1, total_pages), total_pages)
}

pub(crate) async fn approve(ctx: &Ctx, id: ListingId) -> Result<Answer> {
    let outcome = match ctx.state.gate.approve(ctx.user, id).await {
        Ok(outcome) => outcome,
        Err(e) => return refused(ctx, e),
    };

    let id_text = id.to_string();
    let key = if outcome.published {
        TextKey::AdminApprovedDone
    } else {
        TextKey::AdminPublishFailed
    };
    let text = i18n::format(ctx.lang, key, &[("id", id_text.as_str())]);
    direct(ctx).send(&text).await?;
    Ok(Answer::toast(text))
}

/// Ask for the mandatory reason; the moderator's next text message completes the rejection.
pub(crate) async fn begin_reject(ctx: &Ctx, id: ListingId) -> Result<Answer> {
    if let Err(e) = ctx.state.gate.begin_reject(ctx.user, id).await {
        return refused(ctx, e);
    }

    let dm = direct(ctx);
    dm.state
        .conversations
        .set(dm.chat_id, Conversation::AwaitingRejectReason { listing_id: id })
        .await;
    let id_text = id.to_string();
    dm.send(&i18n::format(
        ctx.lang,
        TextKey::AskRejectReason,
        &[("id", id_text.as_str())],
    ))
    .await?;
    Ok(Answer::none())
}

pub(crate) async fn finish_reject(ctx: &Ctx, id: ListingId, reason: &str) -> Result<()> {
    if reason.trim().is_empty() {
        // Still waiting for a reason.
        return ctx.send(ctx.t(TextKey::ReasonRequired)).await.map(|_| ());
    }
    ctx.state.conversations.clear(ctx.chat_id).await;

    match ctx.state.gate.reject(ctx.user, id, reason).await {
        Ok(_) => {
            let id_text = id.to_string();
            ctx.send_keyboard(
                &i18n::format(ctx.lang, TextKey::AdminRejectedDone, &[("id", id_text.as_str())]),
                keyboards::admin_panel(ctx.lang),
            )
            .await
            .map(|_| ())
        }
        Err(e) => match refused(ctx, e)? {
            Answer { text: Some(text), .. } => ctx.send(&text).await.map(|_| ()),
            Answer { text: None, .. } => Ok(()),
        },
    }
}

/// Authorization and review-state failures are answered, not reported as errors.
fn refused(ctx: &Ctx, err: Error) -> Result<Answer> {
    let key = match &err {
        Error::Forbidden(_) => Some(TextKey::AdminOnly),
        Error::InvalidTransition(_) => Some(TextKey::AlreadyReviewed),
        Error::NotFound(_) => Some(TextKey::ListingNotFound),
        Error::Validation(_) => Some(TextKey::ReasonRequired),
        _ => None,
    };
    let Some(key) = key else {
        return Err(err);
    };
    tracing::info!(user = ctx.user.0, error = %err, "moderation action refused");
    Ok(Answer::alert(ctx.t(key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_pages_are_clamped() {
        assert_eq!(clamp_page(1, 5, 12), (1, 3));
        assert_eq!(clamp_page(7, 5, 12), (3, 3));
        assert_eq!(clamp_page(2, 5, 5), (1, 1));
        assert_eq!(clamp_page(0, 5, 1), (1, 1));
    }
}
