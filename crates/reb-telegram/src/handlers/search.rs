use reb_core::{
    activity::ActivityEvent,
    conversation::Conversation,
    domain::MessageRef,
    i18n::{self, TextKey},
    listing::listing_card,
    locations,
    messaging::{callbacks::View, keyboards},
    ports::LocationFilter,
    Result,
};

use crate::router::SearchQuery;

use super::{fetch_page, send_page, Card, Ctx};

pub(crate) async fn ask_keyword(ctx: &Ctx, msg: MessageRef) -> Result<()> {
    ctx.state
        .conversations
        .set(ctx.chat_id, Conversation::AwaitingSearchQuery)
        .await;
    ctx.replace(msg, ctx.t(TextKey::AskKeyword), keyboards::home(ctx.lang))
        .await
}

pub(crate) async fn choose_region(ctx: &Ctx, msg: MessageRef) -> Result<()> {
    ctx.replace(
        msg,
        ctx.t(TextKey::AskSearchRegion),
        keyboards::search_regions(ctx.lang),
    )
    .await
}

pub(crate) async fn choose_district(ctx: &Ctx, msg: MessageRef, region: &str) -> Result<()> {
    let Some(region) = locations::find_region(region) else {
        return ctx.send(ctx.t(TextKey::UnknownRegion)).await.map(|_| ());
    };
    ctx.replace(
        msg,
        ctx.t(TextKey::AskSearchDistrict),
        keyboards::search_districts(ctx.lang, region),
    )
    .await
}

/// Location is chosen; asks which property type to search for.
pub(crate) async fn choose_property_type(
    ctx: &Ctx,
    msg: MessageRef,
    filter: LocationFilter,
) -> Result<()> {
    if let Some(key) = unknown_location(&filter) {
        return ctx.send(ctx.t(key)).await.map(|_| ());
    }
    ctx.replace(
        msg,
        ctx.t(TextKey::AskSearchPropertyType),
        keyboards::search_property_types(ctx.lang, &filter),
    )
    .await
}

pub(crate) async fn choose_status(ctx: &Ctx, msg: MessageRef, filter: LocationFilter) -> Result<()> {
    if let Some(key) = unknown_location(&filter) {
        return ctx.send(ctx.t(key)).await.map(|_| ());
    }
    ctx.replace(
        msg,
        ctx.t(TextKey::AskSearchStatus),
        keyboards::search_statuses(ctx.lang, &filter),
    )
    .await
}

/// Stale buttons may name a region or district that no longer exists.
fn unknown_location(filter: &LocationFilter) -> Option<TextKey> {
    let region = filter.region.as_deref()?;
    if locations::find_region(region).is_none() {
        return Some(TextKey::UnknownRegion);
    }
    match filter.district.as_deref() {
        Some(d) if locations::find_district(region, d).is_none() => Some(TextKey::UnknownDistrict),
        _ => None,
    }
}

pub(crate) async fn run_keyword(ctx: &Ctx, text: &str) -> Result<()> {
    let query = text.trim();
    if query.is_empty() {
        return ctx.send(ctx.t(TextKey::EmptyText)).await.map(|_| ());
    }
    ctx.state.conversations.clear(ctx.chat_id).await;
    run(ctx, SearchQuery::Keyword(query.to_string()), 1, true).await
}

pub(crate) async fn run_location(ctx: &Ctx, filter: LocationFilter) -> Result<()> {
    run(ctx, SearchQuery::Location(filter), 1, true).await
}

/// Another page of the chat's last search.
pub(crate) async fn show_page(ctx: &Ctx, page: u32) -> Result<()> {
    let last = ctx.state.searches.get(ctx.chat_id).await;
    match last {
        Some(query) => run(ctx, query, page, false).await,
        None => ctx.show_main_menu(TextKey::SessionExpired).await,
    }
}

async fn run(ctx: &Ctx, query: SearchQuery, page: u32, fresh: bool) -> Result<()> {
    let store = &ctx.state.store;
    let size = ctx.state.cfg.search_results_per_page;
    let paged = match &query {
        SearchQuery::Keyword(q) => fetch_page(page, size, |p| store.search_keyword(q, p)).await?,
        SearchQuery::Location(f) => fetch_page(page, size, |p| store.search_location(f, p)).await?,
    };

    if fresh {
        let (kind, logged) = describe(&query);
        tracing::info!(user = ctx.user.0, kind, query = %logged, results = paged.total, "search");
        let event = ActivityEvent::search(ctx.user, kind, &logged, paged.total);
        if let Err(e) = store.log_activity(&event).await {
            tracing::warn!(user = ctx.user.0, error = %e, "failed to log activity");
        }
    }

    ctx.state.searches.remember(ctx.chat_id, query).await;

    if paged.total == 0 {
        return ctx
            .send_keyboard(ctx.t(TextKey::NoResults), keyboards::search_choice(ctx.lang))
            .await
            .map(|_| ());
    }

    let total = paged.total.to_string();
    let header = i18n::format(
        ctx.lang,
        TextKey::SearchResultsHeader,
        &[("total", total.as_str())],
    );
    let cards = paged
        .items
        .iter()
        .map(|l| {
            Card::new(
                listing_card(ctx.lang, l),
                l,
                keyboards::listing_actions(ctx.lang, l.id),
            )
        })
        .collect();
    send_page(
        ctx,
        &header,
        cards,
        View::SearchResults,
        paged.page.number,
        paged.total_pages(),
    )
    .await
}

/// Activity-log kind and query text.
fn describe(query: &SearchQuery) -> (&'static str, String) {
    match query {
        SearchQuery::Keyword(q) => ("keyword", q.clone()),
        SearchQuery::Location(f) => {
            let parts: Vec<&str> = [
                f.region.as_deref(),
                f.district.as_deref(),
                f.property_type.map(|t| t.as_str()),
                f.status.map(|s| s.as_str()),
            ]
            .into_iter()
            .flatten()
            .collect();
            ("location", parts.join("/"))
        }
    }
}
