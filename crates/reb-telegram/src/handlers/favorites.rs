use reb_core::{
    activity::{ActivityAction, ActivityEvent},
    domain::{Language, Listing, ListingId},
    formatting::truncate_chars,
    i18n::{self, TextKey},
    listing::listing_card,
    messaging::{callbacks::View, keyboards},
    Result,
};

use super::{callback::Answer, fetch_page, send_page, Card, Ctx};

/// Telegram rejects alert texts over 200 characters.
const ALERT_CONTACT_MAX_CHARS: usize = 150;

pub(crate) async fn show(ctx: &Ctx, page: u32) -> Result<()> {
    let store = &ctx.state.store;
    let size = ctx.state.cfg.search_results_per_page;
    let paged = fetch_page(page, size, |p| store.favorites(ctx.user, p)).await?;

    if paged.total == 0 {
        return ctx
            .send_keyboard(ctx.t(TextKey::FavoritesEmpty), keyboards::home(ctx.lang))
            .await
            .map(|_| ());
    }

    let total = paged.total.to_string();
    let header = i18n::format(ctx.lang, TextKey::FavoritesHeader, &[("total", total.as_str())]);
    let cards = paged
        .items
        .iter()
        .map(|l| {
            Card::new(
                listing_card(ctx.lang, l),
                l,
                keyboards::favorite_actions(ctx.lang, l.id),
            )
        })
        .collect();
    send_page(
        ctx,
        &header,
        cards,
        View::Favorites,
        paged.page.number,
        paged.total_pages(),
    )
    .await
}

/// Only public listings can be saved; saving twice is a no-op.
pub(crate) async fn add(ctx: &Ctx, id: ListingId) -> Result<Answer> {
    let listing = ctx.state.store.get_listing(id).await?;
    match listing {
        None => return Ok(Answer::alert(ctx.t(TextKey::ListingNotFound))),
        Some(l) if !l.is_public() => return Ok(Answer::alert(ctx.t(TextKey::FavoriteUnavailable))),
        Some(_) => {}
    }

    if !ctx.state.store.add_favorite(ctx.user, id).await? {
        return Ok(Answer::toast(ctx.t(TextKey::FavoriteAlready)));
    }
    tracing::info!(user = ctx.user.0, listing_id = id.0, "favorite added");
    log(ctx, ActivityAction::FavoriteAdd, id).await;
    Ok(Answer::toast(ctx.t(TextKey::FavoriteAdded)))
}

/// Contact info as an alert, for public listings and for their owner.
pub(crate) async fn contact(ctx: &Ctx, id: ListingId) -> Result<Answer> {
    let listing = ctx.state.store.get_listing(id).await?;
    let Some(listing) = listing.filter(|l| l.is_public() || l.author_id == ctx.user) else {
        return Ok(Answer::alert(ctx.t(TextKey::FavoriteUnavailable)));
    };
    log(ctx, ActivityAction::Contact, id).await;
    Ok(Answer::alert(contact_alert(ctx.lang, &listing)))
}

fn contact_alert(lang: Language, listing: &Listing) -> String {
    let contact = truncate_chars(&listing.contact_info, ALERT_CONTACT_MAX_CHARS);
    i18n::format(lang, TextKey::ContactAlert, &[("contact", contact.as_str())])
}

async fn log(ctx: &Ctx, action: ActivityAction, id: ListingId) {
    let event = ActivityEvent::new(ctx.user, action).on_listing(id);
    if let Err(e) = ctx.state.store.log_activity(&event).await {
        tracing::warn!(user = ctx.user.0, listing_id = id.0, error = %e, "failed to log activity");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reb_core::domain::{ApprovalStatus, DealStatus, PropertyType, UserId};

    fn listing(contact_info: &str) -> Listing {
        let now = Utc::now();
        Listing {
            id: ListingId(1),
            author_id: UserId(10),
            author_username: None,
            author_first_name: None,
            title: "Uy".into(),
            description: "Uy".into(),
            property_type: PropertyType::House,
            status: DealStatus::Sale,
            is_makler: false,
            region: "samarkand".into(),
            district: "urgut".into(),
            full_address: "Urgut, Samarqand".into(),
            price: 1,
            area: 1.0,
            contact_info: contact_info.into(),
            photo_file_ids: Vec::new(),
            approval_status: ApprovalStatus::Approved,
            is_approved: true,
            is_active: true,
            favorites_count: 0,
            created_at: now,
            updated_at: now,
            published_at: Some(now),
        }
    }

    #[test]
    fn contact_alert_stays_under_the_telegram_limit() {
        let short = contact_alert(Language::En, &listing("+998 90 123 45 67"));
        assert!(short.contains("+998 90 123 45 67"));

        let long = contact_alert(Language::Ru, &listing(&"9".repeat(500)));
        assert!(long.chars().count() <= 200, "{}", long.chars().count());
    }
}
