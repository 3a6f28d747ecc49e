use reb_core::{
    domain::{ListingId, MessageRef},
    errors::Error,
    i18n::{self, TextKey},
    listing::my_posting_card,
    messaging::{callbacks::View, keyboards},
    Result,
};

use super::{callback::Answer, error_text, fetch_page, send_page, Card, Ctx};

pub(crate) async fn show(ctx: &Ctx, page: u32) -> Result<()> {
    let store = &ctx.state.store;
    let size = ctx.state.cfg.postings_per_page;
    let paged = fetch_page(page, size, |p| store.user_listings(ctx.user, p)).await?;

    if paged.total == 0 {
        return ctx
            .send_keyboard(ctx.t(TextKey::MyPostingsEmpty), keyboards::main_menu(ctx.lang, ctx.is_moderator()))
            .await
            .map(|_| ());
    }

    let total = paged.total.to_string();
    let header = i18n::format(ctx.lang, TextKey::MyPostingsHeader, &[("total", total.as_str())]);
    let cards = paged
        .items
        .iter()
        .map(|l| {
            Card::new(
                my_posting_card(ctx.lang, l),
                l,
                keyboards::my_posting_actions(ctx.lang, l),
            )
        })
        .collect();
    send_page(
        ctx,
        &header,
        cards,
        View::MyPostings,
        paged.page.number,
        paged.total_pages(),
    )
    .await
}

pub(crate) async fn set_active(
    ctx: &Ctx,
    msg: MessageRef,
    id: ListingId,
    active: bool,
) -> Result<Answer> {
    let listing = match ctx.state.gate.set_active(ctx.user, id, active).await {
        Ok(listing) => listing,
        Err(e) => return refused(ctx, e),
    };
    tracing::info!(user = ctx.user.0, listing_id = id.0, active, "listing toggled");

    ctx.replace(
        msg,
        &my_posting_card(ctx.lang, &listing),
        keyboards::my_posting_actions(ctx.lang, &listing),
    )
    .await?;
    let key = if active {
        TextKey::Activated
    } else {
        TextKey::Deactivated
    };
    Ok(Answer::toast(ctx.t(key)))
}

pub(crate) async fn ask_delete(ctx: &Ctx, id: ListingId) -> Result<()> {
    ctx.state.gate.owned_listing(ctx.user, id).await?;
    let id_text = id.to_string();
    ctx.send_keyboard(
        &i18n::format(ctx.lang, TextKey::ConfirmDelete, &[("id", id_text.as_str())]),
        keyboards::confirm_delete(ctx.lang, id),
    )
    .await
    .map(|_| ())
}

pub(crate) async fn delete(ctx: &Ctx, msg: MessageRef, id: ListingId) -> Result<Answer> {
    let outcome = match ctx.state.gate.delete(ctx.user, id).await {
        Ok(outcome) => outcome,
        Err(e) => return refused(ctx, e),
    };
    tracing::info!(user = ctx.user.0, listing_id = id.0, notified = outcome.notified, "listing deleted by owner");
    ctx.replace(msg, ctx.t(TextKey::Deleted), keyboards::home(ctx.lang))
        .await?;
    Ok(Answer::none())
}

pub(crate) async fn keep(ctx: &Ctx, msg: MessageRef) -> Result<Answer> {
    ctx.replace(msg, ctx.t(TextKey::DeleteCancelled), keyboards::home(ctx.lang))
        .await?;
    Ok(Answer::none())
}

/// Ownership and existence failures become an alert; anything else is a real error.
fn refused(ctx: &Ctx, err: Error) -> Result<Answer> {
    match err {
        Error::Forbidden(_) | Error::NotFound(_) => {
            tracing::info!(user = ctx.user.0, error = %err, "listing action refused");
            Ok(Answer::alert(error_text(ctx.lang, &err)))
        }
        other => Err(other),
    }
}
