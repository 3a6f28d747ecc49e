//! The listing form: feeds events into the draft state machine and renders its effects.

use reb_core::{
    conversation::Conversation,
    domain::{Destination, Language},
    draft::{transition, Draft, Effect, FormEvent, FormState, Rejection, Step},
    formatting::escape_html,
    i18n::{self, TextKey},
    listing::{personalized_template, preview_text},
    messaging::{callbacks::FormButton, keyboards, types::Post},
    Result,
};

use super::Ctx;

/// Open a fresh form, dropping any flow the chat was in.
pub(crate) async fn start(ctx: &Ctx) -> Result<()> {
    ctx.reset().await;
    let (form, effects) = FormState::start();
    tracing::info!(chat_id = ctx.chat_id.0, user = ctx.user.0, "posting started");
    apply(ctx, form, effects).await
}

/// Advance the chat's form by one event. Chats without a form are told their session expired.
pub(crate) async fn handle_event(ctx: &Ctx, event: FormEvent) -> Result<()> {
    let Some(Conversation::Posting(form)) = ctx.state.conversations.get(ctx.chat_id).await else {
        return ctx.show_main_menu(TextKey::SessionExpired).await;
    };
    let (next, effects) = transition(form, event);
    apply(ctx, next, effects).await
}

pub(crate) async fn on_button(ctx: &Ctx, button: FormButton) -> Result<()> {
    if matches!(button, FormButton::PhotosDone | FormButton::PhotosSkip) {
        // Albums still inside their debounce window belong to the draft before it moves on.
        for batch in ctx.state.collector.take_owner(ctx.chat_id).await {
            tracing::debug!(chat_id = ctx.chat_id.0, group_id = %batch.group_id, "early media group flush");
            handle_event(
                ctx,
                FormEvent::PhotosAppended {
                    file_ids: batch.items,
                    batched: true,
                },
            )
            .await?;
        }
    }
    handle_event(ctx, form_event(button)).await
}

fn form_event(button: FormButton) -> FormEvent {
    match button {
        FormButton::PropertyType(t) => FormEvent::PropertyTypeChosen(t),
        FormButton::Status(s) => FormEvent::StatusChosen(s),
        FormButton::Makler(m) => FormEvent::MaklerChosen(m),
        FormButton::Region(key) => FormEvent::RegionChosen(key),
        FormButton::District(key) => FormEvent::DistrictChosen(key),
        FormButton::DescriptionDone => FormEvent::DescriptionDone,
        FormButton::DescriptionAddMore => FormEvent::DescriptionAddMore,
        FormButton::PhotosDone => FormEvent::PhotosDone,
        FormButton::PhotosSkip => FormEvent::PhotosSkip,
        FormButton::Confirm => FormEvent::Confirm,
        FormButton::EditMenu => FormEvent::OpenEditMenu,
        FormButton::Edit(field) => FormEvent::Edit(field),
        FormButton::BackToPreview => FormEvent::BackToPreview,
        FormButton::Back => FormEvent::Back,
        FormButton::Cancel => FormEvent::Cancel,
    }
}

async fn apply(ctx: &Ctx, form: FormState, effects: Vec<Effect>) -> Result<()> {
    // Terminal states clear the chat.
    ctx.state
        .conversations
        .set(ctx.chat_id, Conversation::Posting(form.clone()))
        .await;
    for effect in effects {
        render(ctx, &form, effect).await?;
    }
    Ok(())
}

async fn render(ctx: &Ctx, form: &FormState, effect: Effect) -> Result<()> {
    match effect {
        Effect::Prompt(step) => prompt(ctx, form, step).await,
        Effect::Reject(Rejection::Stale) => match form.step() {
            Some(step) => prompt(ctx, form, step).await,
            None => Ok(()),
        },
        Effect::Reject(why) => ctx.send(ctx.t(rejection_key(why))).await.map(|_| ()),
        Effect::ShowTemplate => match form.draft().and_then(|d| personalized_template(ctx.lang, d)) {
            Some(template) => ctx.send(&template).await.map(|_| ()),
            None => Ok(()),
        },
        Effect::PhotosAdded {
            added,
            total,
            batched,
        } => {
            ctx.send(&photos_added_text(ctx.lang, added, total, batched))
                .await?;
            let max = ctx.state.cfg.max_photos;
            if crossed_photo_limit(added, total, max) {
                let max = max.to_string();
                ctx.send(&i18n::format(
                    ctx.lang,
                    TextKey::PhotosOverLimit,
                    &[("max", max.as_str())],
                ))
                .await?;
            }
            Ok(())
        }
        Effect::PhotosCleared => ctx.send(ctx.t(TextKey::PhotosCleared)).await.map(|_| ()),
        Effect::Submit => submit(ctx, form).await,
        Effect::Discard => {
            ctx.state.collector.discard_owner(ctx.chat_id).await;
            tracing::info!(chat_id = ctx.chat_id.0, "posting cancelled");
            ctx.show_main_menu(TextKey::Cancelled).await
        }
    }
}

async fn prompt(ctx: &Ctx, form: &FormState, step: Step) -> Result<()> {
    let Some(draft) = form.draft() else {
        return Ok(());
    };
    if step == Step::Preview {
        return show_preview(ctx, form).await;
    }

    let appending = matches!(form, FormState::Collecting(f) if f.appending);
    let mut text = ctx.t(prompt_key(step, appending)).to_string();
    if step == Step::DescriptionReview {
        if let Some(description) = &draft.description {
            text = format!("{text}\n\n<i>{}</i>", escape_html(description));
        }
    }
    ctx.send_keyboard(&text, keyboards::form_step(ctx.lang, step, draft))
        .await
        .map(|_| ())
}

/// The exact channel text plus the attached photos, with confirm / edit / cancel.
async fn show_preview(ctx: &Ctx, form: &FormState) -> Result<()> {
    let Some(draft) = form.draft() else {
        return Ok(());
    };
    let Some(text) = preview_text(ctx.lang, draft) else {
        return ctx.send(ctx.t(TextKey::GenericError)).await.map(|_| ());
    };
    let text = format!("{text}\n\n{}", ctx.t(TextKey::ConfirmPosting));
    let post = Post::new(text, &draft.photo_file_ids, ctx.state.cfg.max_photos)
        .with_keyboard(keyboards::form_step(ctx.lang, Step::Preview, draft));
    ctx.state
        .messenger
        .post(&Destination::Chat(ctx.chat_id), &post)
        .await
        .map(|_| ())
}

async fn submit(ctx: &Ctx, form: &FormState) -> Result<()> {
    let Some(draft) = form.draft().cloned() else {
        return Ok(());
    };
    let Some(listing) = draft.to_new_listing(ctx.lang) else {
        // Unreachable through the form; keep the data and show the preview again.
        return resume_preview(ctx, draft).await;
    };

    match ctx.state.gate.submit(ctx.user, &listing).await {
        Ok(id) => {
            let id = id.to_string();
            ctx.send_keyboard(
                &i18n::format(ctx.lang, TextKey::ListingSubmitted, &[("id", id.as_str())]),
                keyboards::main_menu(ctx.lang, ctx.is_moderator()),
            )
            .await
            .map(|_| ())
        }
        Err(e) => {
            tracing::error!(chat_id = ctx.chat_id.0, user = ctx.user.0, error = %e, "failed to save listing");
            ctx.send(ctx.t(TextKey::SaveFailed)).await?;
            resume_preview(ctx, draft).await
        }
    }
}

/// Put the draft back at the preview so confirm can be retried.
async fn resume_preview(ctx: &Ctx, draft: Draft) -> Result<()> {
    let form = FormState::resume_preview(draft);
    ctx.state
        .conversations
        .set(ctx.chat_id, Conversation::Posting(form.clone()))
        .await;
    show_preview(ctx, &form).await
}

fn prompt_key(step: Step, appending: bool) -> TextKey {
    match step {
        Step::PropertyType => TextKey::AskPropertyType,
        Step::Status => TextKey::AskStatus,
        Step::MaklerType => TextKey::AskMakler,
        Step::Region => TextKey::AskRegion,
        Step::District => TextKey::AskDistrict,
        Step::Price => TextKey::AskPrice,
        Step::Area => TextKey::AskArea,
        Step::Description if appending => TextKey::AskDescriptionMore,
        Step::Description => TextKey::AskDescription,
        Step::DescriptionReview => TextKey::DescriptionReview,
        Step::ContactInfo => TextKey::AskContact,
        Step::Photos => TextKey::AskPhotos,
        Step::Preview => TextKey::PreviewTitle,
        Step::EditMenu => TextKey::EditWhat,
    }
}

fn rejection_key(why: Rejection) -> TextKey {
    match why {
        Rejection::InvalidPrice => TextKey::InvalidPrice,
        Rejection::InvalidArea => TextKey::InvalidArea,
        Rejection::UnknownRegion => TextKey::UnknownRegion,
        Rejection::UnknownDistrict => TextKey::UnknownDistrict,
        Rejection::EmptyText => TextKey::EmptyText,
        Rejection::UseButtons | Rejection::Stale => TextKey::UseButtons,
    }
}

fn photos_added_text(lang: Language, added: usize, total: usize, batched: bool) -> String {
    let (added, total) = (added.to_string(), total.to_string());
    let key = if batched {
        TextKey::PhotosBatchAdded
    } else {
        TextKey::PhotoAdded
    };
    i18n::format(lang, key, &[("added", added.as_str()), ("total", total.as_str())])
}

/// Warn once, when the running total first goes past what the channel will show.
fn crossed_photo_limit(added: usize, total: usize, max: usize) -> bool {
    total > max && total.saturating_sub(added) <= max
}
