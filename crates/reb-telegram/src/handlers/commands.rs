use teloxide::types::{Message, User};

use reb_core::{
    activity::{ActivityAction, ActivityEvent},
    domain::{Language, UserId, UserProfile},
    i18n::TextKey,
    messaging::keyboards,
    Result,
};

use super::{admin, favorites, my_postings, posting, Ctx};

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

/// Language for a user seen for the first time: their Telegram client language when we
/// speak it (`ru-RU` → ru), the configured default otherwise.
fn initial_language(language_code: Option<&str>, default: Language) -> Language {
    language_code
        .and_then(|code| code.split(['-', '_']).next())
        .and_then(Language::from_code)
        .unwrap_or(default)
}

fn profile(user: &User) -> UserProfile {
    UserProfile {
        user_id: UserId(user.id.0 as i64),
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()).filter(|n| !n.is_empty()),
        last_name: user.last_name.clone(),
    }
}

pub(crate) async fn handle_command(ctx: &Ctx, msg: &Message, text: &str) -> Result<()> {
    let (cmd, _args) = parse_command(text);
    tracing::debug!(chat_id = ctx.chat_id.0, user = ctx.user.0, cmd = %cmd, "command");

    match cmd.as_str() {
        "start" => start(ctx, msg).await,
        "help" => ctx
            .send_keyboard(ctx.t(TextKey::Help), keyboards::home(ctx.lang))
            .await
            .map(|_| ()),
        "cancel" => {
            ctx.reset().await;
            ctx.show_main_menu(TextKey::Cancelled).await
        }
        "language" | "lang" => ctx
            .send_keyboard(ctx.t(TextKey::ChooseLanguage), keyboards::language_picker())
            .await
            .map(|_| ()),
        "post" => posting::start(ctx).await,
        "search" => {
            ctx.reset().await;
            ctx.send_keyboard(ctx.t(TextKey::SearchChoose), keyboards::search_choice(ctx.lang))
                .await
                .map(|_| ())
        }
        "favorites" => favorites::show(ctx, 1).await,
        "my" | "mypostings" => my_postings::show(ctx, 1).await,
        "admin" => admin::panel(ctx, None).await,
        _ => ctx.show_main_menu(TextKey::MainMenu).await,
    }
}

/// Register (or refresh) the user, then show the welcome text with the main menu.
async fn start(ctx: &Ctx, msg: &Message) -> Result<()> {
    ctx.reset().await;

    let mut lang = ctx.lang;
    if let Some(user) = msg.from() {
        let first_seen = initial_language(user.language_code.as_deref(), ctx.state.cfg.default_language);
        match ctx.state.store.upsert_user(&profile(user), first_seen).await {
            Ok(()) => lang = ctx.state.language_of(ctx.user).await,
            Err(e) => tracing::warn!(user = ctx.user.0, error = %e, "failed to upsert user"),
        }
    }

    let event = ActivityEvent::new(ctx.user, ActivityAction::Start);
    if let Err(e) = ctx.state.store.log_activity(&event).await {
        tracing::warn!(user = ctx.user.0, error = %e, "failed to log activity");
    }
    tracing::info!(user = ctx.user.0, lang = lang.code(), "start");

    let ctx = Ctx {
        lang,
        ..ctx.clone()
    };
    ctx.show_main_menu(TextKey::Welcome).await
}
