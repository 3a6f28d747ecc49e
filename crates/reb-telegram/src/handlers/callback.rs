use serde_json::json;

use reb_core::{
    activity::{ActivityAction, ActivityEvent},
    domain::{Language, MessageRef},
    i18n::TextKey,
    messaging::{
        callbacks::{CallbackAction, MenuItem, View},
        keyboards,
    },
    ports::LocationFilter,
    Result,
};

use super::{admin, favorites, my_postings, posting, search, Ctx};

/// What to show in the callback answer (toast or alert).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Answer {
    pub text: Option<String>,
    pub alert: bool,
}

impl Answer {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn toast(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            alert: false,
        }
    }

    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            alert: true,
        }
    }
}

pub(crate) async fn dispatch(ctx: &Ctx, msg: MessageRef, action: CallbackAction) -> Result<Answer> {
    tracing::debug!(chat_id = ctx.chat_id.0, user = ctx.user.0, action = %action, "callback");
    let done = |r: Result<()>| r.map(|_| Answer::none());

    match action {
        CallbackAction::Noop => Ok(Answer::none()),
        CallbackAction::Menu(item) => done(menu(ctx, msg, item).await),
        CallbackAction::SetLanguage(lang) => done(set_language(ctx, msg, lang).await),
        CallbackAction::Form(button) => done(posting::on_button(ctx, button).await),
        CallbackAction::SearchKeyword => done(search::ask_keyword(ctx, msg).await),
        CallbackAction::SearchLocation => done(search::choose_region(ctx, msg).await),
        CallbackAction::SearchRegion(region) => {
            done(search::choose_district(ctx, msg, &region).await)
        }
        CallbackAction::SearchDistrict { region, district } => {
            let filter = match district {
                Some(d) => LocationFilter::district(region, d),
                None => LocationFilter::region(region),
            };
            done(search::choose_property_type(ctx, msg, filter).await)
        }
        CallbackAction::SearchPropertyType(filter) => {
            done(search::choose_status(ctx, msg, filter).await)
        }
        CallbackAction::SearchRun(filter) => done(search::run_location(ctx, filter).await),
        CallbackAction::Page { view, page } => done(match view {
            View::MyPostings => my_postings::show(ctx, page).await,
            View::Favorites => favorites::show(ctx, page).await,
            View::SearchResults => search::show_page(ctx, page).await,
            View::Pending => admin::show_pending(ctx, page).await,
        }),
        CallbackAction::AddFavorite(id) => favorites::add(ctx, id).await,
        CallbackAction::Contact(id) => favorites::contact(ctx, id).await,
        CallbackAction::Activate(id) => my_postings::set_active(ctx, msg, id, true).await,
        CallbackAction::Deactivate(id) => my_postings::set_active(ctx, msg, id, false).await,
        CallbackAction::Delete(id) => done(my_postings::ask_delete(ctx, id).await),
        CallbackAction::ConfirmDelete(id) => my_postings::delete(ctx, msg, id).await,
        CallbackAction::KeepListing(_) => my_postings::keep(ctx, msg).await,
        CallbackAction::Approve(id) => admin::approve(ctx, id).await,
        CallbackAction::Reject(id) => admin::begin_reject(ctx, id).await,
    }
}

/// Any menu action abandons the flow the chat was in.
async fn menu(ctx: &Ctx, msg: MessageRef, item: MenuItem) -> Result<()> {
    if let Some(previous) = ctx.reset().await {
        tracing::debug!(chat_id = ctx.chat_id.0, ?previous, "flow abandoned from menu");
    }

    match item {
        MenuItem::Home => {
            ctx.replace(
                msg,
                ctx.t(TextKey::MainMenu),
                keyboards::main_menu(ctx.lang, ctx.is_moderator()),
            )
            .await
        }
        MenuItem::Post => posting::start(ctx).await,
        MenuItem::MyPostings => my_postings::show(ctx, 1).await,
        MenuItem::Search => {
            ctx.replace(msg, ctx.t(TextKey::SearchChoose), keyboards::search_choice(ctx.lang))
                .await
        }
        MenuItem::Favorites => favorites::show(ctx, 1).await,
        MenuItem::Info => {
            ctx.replace(msg, ctx.t(TextKey::Info), keyboards::home(ctx.lang))
                .await
        }
        MenuItem::Language => {
            ctx.replace(
                msg,
                ctx.t(TextKey::ChooseLanguage),
                keyboards::language_picker(),
            )
            .await
        }
        MenuItem::Admin => admin::panel(ctx, Some(msg)).await,
    }
}

async fn set_language(ctx: &Ctx, msg: MessageRef, lang: Language) -> Result<()> {
    let previous = ctx.lang;
    ctx.state.store.set_user_language(ctx.user, lang).await?;
    tracing::info!(user = ctx.user.0, from = previous.code(), to = lang.code(), "language changed");

    let event = ActivityEvent::new(ctx.user, ActivityAction::LanguageChange)
        .with_details(json!({ "from": previous.code(), "to": lang.code() }));
    if let Err(e) = ctx.state.store.log_activity(&event).await {
        tracing::warn!(user = ctx.user.0, error = %e, "failed to log activity");
    }

    let ctx = Ctx {
        lang,
        ..ctx.clone()
    };
    ctx.replace(
        msg,
        ctx.t(TextKey::LanguageChanged),
        keyboards::main_menu(lang, ctx.is_moderator()),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers() {
        assert_eq!(Answer::none().text, None);
        let a = Answer::alert("📞 +998");
        assert!(a.alert);
        assert_eq!(a.text.as_deref(), Some("📞 +998"));
        assert!(!Answer::toast("ok").alert);
    }
}
