//! Moderation gate: submission of finished drafts, approve / reject, and owner actions
//! (activate, deactivate, delete) with their notifications.

use std::sync::Arc;

use serde_json::json;

use crate::{
    activity::{ActivityAction, ActivityEvent},
    config::Config,
    domain::{ApprovalStatus, ChatId, Destination, Language, Listing, ListingId, NewListing, UserId},
    errors::Error,
    formatting::escape_html,
    i18n::{self, TextKey},
    listing::{admin_review_text, channel_text, ChannelPost},
    messaging::{
        keyboards,
        port::MessagingPort,
        types::Post,
    },
    ports::ListingStore,
    security::is_moderator,
    Result,
};

#[derive(Clone, Debug)]
pub struct ReviewConfig {
    pub moderators: Vec<i64>,
    pub channel: Destination,
    pub admin_channel: Option<Destination>,
    pub default_language: Language,
    pub max_photos: usize,
}

impl From<&Config> for ReviewConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            moderators: cfg.moderator_ids.clone(),
            channel: cfg.channel.clone(),
            admin_channel: cfg.admin_channel.clone(),
            default_language: cfg.default_language,
            max_photos: cfg.max_photos,
        }
    }
}

/// Result of an approval. The listing stays approved even when publishing failed.
#[derive(Clone, Debug)]
pub struct ApprovalOutcome {
    pub listing: Listing,
    pub published: bool,
}

/// Result of a deletion: how many users had the listing in their favorites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub notified: usize,
}

pub struct ModerationGate {
    store: Arc<dyn ListingStore>,
    messenger: Arc<dyn MessagingPort>,
    cfg: ReviewConfig,
}

impl ModerationGate {
    pub fn new(
        store: Arc<dyn ListingStore>,
        messenger: Arc<dyn MessagingPort>,
        cfg: ReviewConfig,
    ) -> Self {
        Self {
            store,
            messenger,
            cfg,
        }
    }

    pub fn is_moderator(&self, user: UserId) -> bool {
        is_moderator(user, &self.cfg.moderators)
    }

    /// Store a finished draft as pending and hand it to the moderators.
    ///
    /// Only the insert can fail the call; moderator notifications are best effort.
    pub async fn submit(&self, author: UserId, listing: &NewListing) -> Result<ListingId> {
        let id = self.store.insert_listing(author, listing).await?;
        tracing::info!(listing_id = id.0, author = author.0, "listing submitted for review");

        self.log(
            ActivityEvent::new(author, ActivityAction::PostListing)
                .on_listing(id)
                .with_details(json!({
                    "property_type": listing.property_type.as_str(),
                    "status": listing.status.as_str(),
                    "photos": listing.photo_file_ids.len(),
                })),
        )
        .await;

        match self.store.get_listing(id).await {
            Ok(Some(stored)) => self.notify_moderators(&stored).await,
            Ok(None) => tracing::warn!(listing_id = id.0, "submitted listing vanished before review"),
            Err(e) => tracing::warn!(listing_id = id.0, error = %e, "failed to load submitted listing"),
        }
        Ok(id)
    }

    async fn notify_moderators(&self, listing: &Listing) {
        let review = Post::new(
            admin_review_text(listing),
            &listing.photo_file_ids,
            self.cfg.max_photos,
        );

        if let Some(admin_channel) = &self.cfg.admin_channel {
            let post = review
                .clone()
                .with_keyboard(keyboards::approval(Language::Uz, listing.id));
            if let Err(e) = self.messenger.post(admin_channel, &post).await {
                tracing::warn!(listing_id = listing.id.0, error = %e, "failed to post to admin channel");
            }
        }

        let id = listing.id.to_string();
        for moderator in &self.cfg.moderators {
            let user = UserId(*moderator);
            let lang = self.language_of(user).await;
            let keyboard = keyboards::approval(lang, listing.id);
            let chat = ChatId::from(user);
            // Without an admin channel each moderator gets the whole submission.
            let sent = if self.cfg.admin_channel.is_some() {
                let notice = i18n::format(lang, TextKey::ModeratorNotice, &[("id", id.as_str())]);
                self.messenger
                    .send_inline_keyboard(chat, &notice, keyboard)
                    .await
                    .map(|_| ())
            } else {
                let post = review.clone().with_keyboard(keyboard);
                self.messenger
                    .post(&Destination::Chat(chat), &post)
                    .await
                    .map(|_| ())
            };
            if let Err(e) = sent {
                tracing::warn!(moderator, listing_id = listing.id.0, error = %e, "failed to notify moderator");
            }
        }
    }

    /// Approve a pending listing and publish it to the channel.
    ///
    /// The approval is committed first; a failed channel post is reported through
    /// `published: false` and never rolls the approval back.
    pub async fn approve(&self, moderator: UserId, id: ListingId) -> Result<ApprovalOutcome> {
        self.require_moderator(moderator)?;
        self.move_pending(id, ApprovalStatus::Approved).await?;
        let listing = self
            .store
            .get_listing(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("listing {id}")))?;

        let post = Post::new(
            channel_text(ChannelPost::from(&listing)),
            &listing.photo_file_ids,
            self.cfg.max_photos,
        );
        let published = match self.messenger.post(&self.cfg.channel, &post).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(listing_id = id.0, channel = %self.cfg.channel, error = %e, "failed to publish approved listing");
                false
            }
        };
        tracing::info!(listing_id = id.0, moderator = moderator.0, published, "listing approved");

        let lang = self.language_of(listing.author_id).await;
        self.notify(
            listing.author_id,
            i18n::text(lang, TextKey::AdminApprovedNotification),
        )
        .await;
        self.log(
            ActivityEvent::new(moderator, ActivityAction::Approve)
                .on_listing(id)
                .with_details(json!({ "published": published })),
        )
        .await;

        Ok(ApprovalOutcome { listing, published })
    }

    /// Check that `moderator` may reject `id` before asking for the reason.
    pub async fn begin_reject(&self, moderator: UserId, id: ListingId) -> Result<()> {
        self.require_moderator(moderator)?;
        let listing = self
            .store
            .get_listing(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("listing {id}")))?;
        if listing.approval_status != ApprovalStatus::Pending {
            return Err(Error::InvalidTransition(format!(
                "listing {id} is already {}",
                listing.approval_status.as_str()
            )));
        }
        Ok(())
    }

    /// Reject a pending listing; the author receives `reason` as written.
    pub async fn reject(&self, moderator: UserId, id: ListingId, reason: &str) -> Result<Listing> {
        self.require_moderator(moderator)?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(Error::Validation("a rejection reason is required".into()));
        }
        self.move_pending(id, ApprovalStatus::Rejected).await?;
        let listing = self
            .store
            .get_listing(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("listing {id}")))?;
        tracing::info!(listing_id = id.0, moderator = moderator.0, "listing rejected");

        let lang = self.language_of(listing.author_id).await;
        let escaped = escape_html(reason);
        let message = i18n::format(
            lang,
            TextKey::AdminRejectedNotification,
            &[("reason", escaped.as_str())],
        );
        self.notify(listing.author_id, &message).await;
        self.log(ActivityEvent::reject(moderator, id, reason)).await;

        Ok(listing)
    }

    pub async fn set_active(&self, actor: UserId, id: ListingId, active: bool) -> Result<Listing> {
        let mut listing = self.owned_listing(actor, id).await?;
        self.store.set_active(id, active).await?;
        listing.is_active = active;

        let action = if active {
            ActivityAction::Activate
        } else {
            ActivityAction::Deactivate
        };
        self.log(ActivityEvent::new(actor, action).on_listing(id)).await;
        Ok(listing)
    }

    /// Delete a listing with its favorites and tell everyone who had saved it.
    pub async fn delete(&self, actor: UserId, id: ListingId) -> Result<DeletionOutcome> {
        self.owned_listing(actor, id).await?;
        let affected = self.store.delete_listing(id).await?;
        tracing::info!(listing_id = id.0, actor = actor.0, favorites = affected.len(), "listing deleted");

        for user in &affected {
            let lang = self.language_of(*user).await;
            self.notify(*user, i18n::text(lang, TextKey::FavoriteRemovedNotice))
                .await;
        }
        self.log(
            ActivityEvent::new(actor, ActivityAction::Delete)
                .on_listing(id)
                .with_details(json!({ "notified": affected.len() })),
        )
        .await;

        Ok(DeletionOutcome {
            notified: affected.len(),
        })
    }

    /// The listing, if `actor` owns it or moderates.
    pub async fn owned_listing(&self, actor: UserId, id: ListingId) -> Result<Listing> {
        let listing = self
            .store
            .get_listing(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("listing {id}")))?;
        if listing.author_id != actor && !self.is_moderator(actor) {
            return Err(Error::Forbidden(format!(
                "user {} does not own listing {id}",
                actor.0
            )));
        }
        Ok(listing)
    }

    fn require_moderator(&self, user: UserId) -> Result<()> {
        if self.is_moderator(user) {
            Ok(())
        } else {
            Err(Error::Forbidden(format!("user {} is not a moderator", user.0)))
        }
    }

    async fn move_pending(&self, id: ListingId, to: ApprovalStatus) -> Result<()> {
        if self.store.set_approval(id, to).await? {
            return Ok(());
        }
        match self.store.get_listing(id).await? {
            None => Err(Error::NotFound(format!("listing {id}"))),
            Some(l) => Err(Error::InvalidTransition(format!(
                "listing {id} is already {}",
                l.approval_status.as_str()
            ))),
        }
    }

    async fn language_of(&self, user: UserId) -> Language {
        match self.store.user_language(user).await {
            Ok(Some(lang)) => lang,
            Ok(None) => self.cfg.default_language,
            Err(e) => {
                tracing::warn!(user = user.0, error = %e, "language lookup failed");
                self.cfg.default_language
            }
        }
    }

    async fn notify(&self, user: UserId, html: &str) {
        if let Err(e) = self.messenger.send_html(ChatId::from(user), html).await {
            tracing::warn!(user = user.0, error = %e, "failed to notify user");
        }
    }

    async fn log(&self, event: ActivityEvent) {
        if let Err(e) = self.store.log_activity(&event).await {
            tracing::warn!(action = event.action.as_str(), error = %e, "failed to record activity");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageId, MessageRef, Page, Paged, UserProfile},
        listing::tests::sample_listing,
        messaging::types::{InlineKeyboard, MessagingCapabilities},
        ports::LocationFilter,
    };
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct FakeStore {
        listings: StdMutex<HashMap<i64, Listing>>,
        favorites: StdMutex<HashSet<(i64, i64)>>,
        languages: StdMutex<HashMap<i64, Language>>,
        activity: StdMutex<Vec<ActivityEvent>>,
    }

    impl FakeStore {
        fn with(listings: Vec<Listing>) -> Self {
            let store = Self::default();
            for l in listings {
                store.listings.lock().unwrap().insert(l.id.0, l);
            }
            store
        }

        fn listing(&self, id: i64) -> Option<Listing> {
            self.listings.lock().unwrap().get(&id).cloned()
        }

        fn actions(&self) -> Vec<ActivityAction> {
            self.activity.lock().unwrap().iter().map(|e| e.action).collect()
        }
    }

    fn paged(items: Vec<Listing>, page: Page) -> Paged<Listing> {
        let total = items.len() as i64;
        Paged {
            items: items
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .collect(),
            total,
            page,
        }
    }

    #[async_trait]
    impl ListingStore for FakeStore {
        async fn upsert_user(&self, profile: &UserProfile, language: Language) -> Result<()> {
            self.languages
                .lock()
                .unwrap()
                .entry(profile.user_id.0)
                .or_insert(language);
            Ok(())
        }
        async fn user_language(&self, user: UserId) -> Result<Option<Language>> {
            Ok(self.languages.lock().unwrap().get(&user.0).copied())
        }
        async fn set_user_language(&self, user: UserId, language: Language) -> Result<()> {
            self.languages.lock().unwrap().insert(user.0, language);
            Ok(())
        }
        async fn insert_listing(&self, author: UserId, listing: &NewListing) -> Result<ListingId> {
            let mut map = self.listings.lock().unwrap();
            let id = map.keys().max().copied().unwrap_or(0) + 1;
            let mut stored = sample_listing(id, author.0);
            stored.title = listing.title.clone();
            stored.description = listing.description.clone();
            stored.photo_file_ids = listing.photo_file_ids.clone();
            stored.favorites_count = 0;
            map.insert(id, stored);
            Ok(ListingId(id))
        }
        async fn get_listing(&self, id: ListingId) -> Result<Option<Listing>> {
            Ok(self.listing(id.0))
        }
        async fn pending_listings(&self, limit: i64) -> Result<Vec<Listing>> {
            let map = self.listings.lock().unwrap();
            let mut pending: Vec<Listing> = map
                .values()
                .filter(|l| l.approval_status == ApprovalStatus::Pending)
                .cloned()
                .collect();
            pending.sort_by_key(|l| l.id.0);
            pending.truncate(limit as usize);
            Ok(pending)
        }
        async fn count_pending(&self) -> Result<i64> {
            Ok(self.pending_listings(i64::MAX).await?.len() as i64)
        }
        async fn set_approval(&self, id: ListingId, status: ApprovalStatus) -> Result<bool> {
            let mut map = self.listings.lock().unwrap();
            match map.get_mut(&id.0) {
                Some(l) if l.approval_status == ApprovalStatus::Pending => {
                    l.approval_status = status;
                    l.is_approved = status.is_approved();
                    if status.is_approved() {
                        l.published_at = Some(chrono::Utc::now());
                    }
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
        async fn set_active(&self, id: ListingId, active: bool) -> Result<()> {
            if let Some(l) = self.listings.lock().unwrap().get_mut(&id.0) {
                l.is_active = active;
            }
            Ok(())
        }
        async fn delete_listing(&self, id: ListingId) -> Result<Vec<UserId>> {
            let mut favs = self.favorites.lock().unwrap();
            let mut users: Vec<UserId> = favs
                .iter()
                .filter(|(_, l)| *l == id.0)
                .map(|(u, _)| UserId(*u))
                .collect();
            users.sort_by_key(|u| u.0);
            favs.retain(|(_, l)| *l != id.0);
            self.listings.lock().unwrap().remove(&id.0);
            Ok(users)
        }
        async fn add_favorite(&self, user: UserId, id: ListingId) -> Result<bool> {
            Ok(self.favorites.lock().unwrap().insert((user.0, id.0)))
        }
        async fn favorites(&self, user: UserId, page: Page) -> Result<Paged<Listing>> {
            let ids: Vec<i64> = self
                .favorites
                .lock()
                .unwrap()
                .iter()
                .filter(|(u, _)| *u == user.0)
                .map(|(_, l)| *l)
                .collect();
            let items = ids.into_iter().filter_map(|id| self.listing(id)).collect();
            Ok(paged(items, page))
        }
        async fn user_listings(&self, author: UserId, page: Page) -> Result<Paged<Listing>> {
            let items = self
                .listings
                .lock()
                .unwrap()
                .values()
                .filter(|l| l.author_id == author)
                .cloned()
                .collect();
            Ok(paged(items, page))
        }
        async fn search_keyword(&self, _query: &str, page: Page) -> Result<Paged<Listing>> {
            Ok(paged(Vec::new(), page))
        }
        async fn search_location(
            &self,
            _filter: &LocationFilter,
            page: Page,
        ) -> Result<Paged<Listing>> {
            Ok(paged(Vec::new(), page))
        }
        async fn log_activity(&self, event: &ActivityEvent) -> Result<()> {
            self.activity.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Sent {
        Html { chat: i64, text: String },
        Keyboard { chat: i64, text: String },
        Post { dest: Destination, post: Post },
    }

    #[derive(Default)]
    struct FakeMessenger {
        sent: StdMutex<Vec<Sent>>,
        fail_channel_posts: bool,
    }

    impl FakeMessenger {
        fn failing_channel() -> Self {
            Self {
                fail_channel_posts: true,
                ..Self::default()
            }
        }

        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        fn texts_to(&self, chat: i64) -> Vec<String> {
            self.sent()
                .into_iter()
                .filter_map(|s| match s {
                    Sent::Html { chat: c, text } | Sent::Keyboard { chat: c, text } if c == chat => {
                        Some(text)
                    }
                    _ => None,
                })
                .collect()
        }

        fn posts_to(&self, dest: &Destination) -> Vec<Post> {
            self.sent()
                .into_iter()
                .filter_map(|s| match s {
                    Sent::Post { dest: d, post } if &d == dest => Some(post),
                    _ => None,
                })
                .collect()
        }
    }

    fn msg(chat: ChatId) -> MessageRef {
        MessageRef {
            chat_id: chat,
            message_id: MessageId(1),
        }
    }

    #[async_trait]
    impl MessagingPort for FakeMessenger {
        fn capabilities(&self) -> MessagingCapabilities {
            MessagingCapabilities {
                supports_html: true,
                supports_edit: true,
                max_message_len: 4096,
                max_caption_len: 1024,
                max_album_size: 10,
            }
        }
        async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
            self.sent.lock().unwrap().push(Sent::Html {
                chat: chat_id.0,
                text: html.to_string(),
            });
            Ok(msg(chat_id))
        }
        async fn send_inline_keyboard(
            &self,
            chat_id: ChatId,
            html: &str,
            _keyboard: InlineKeyboard,
        ) -> Result<MessageRef> {
            self.sent.lock().unwrap().push(Sent::Keyboard {
                chat: chat_id.0,
                text: html.to_string(),
            });
            Ok(msg(chat_id))
        }
        async fn edit_html(&self, _msg: MessageRef, _html: &str) -> Result<()> {
            Ok(())
        }
        async fn edit_inline_keyboard(
            &self,
            _msg: MessageRef,
            _html: &str,
            _keyboard: InlineKeyboard,
        ) -> Result<()> {
            Ok(())
        }
        async fn delete_message(&self, _msg: MessageRef) -> Result<()> {
            Ok(())
        }
        async fn post(&self, dest: &Destination, post: &Post) -> Result<Vec<MessageRef>> {
            if self.fail_channel_posts && matches!(dest, Destination::Channel(_)) {
                return Err(Error::External("chat not found".into()));
            }
            self.sent.lock().unwrap().push(Sent::Post {
                dest: dest.clone(),
                post: post.clone(),
            });
            Ok(vec![])
        }
        async fn answer_callback_query(
            &self,
            _callback_id: &str,
            _text: Option<&str>,
            _show_alert: bool,
        ) -> Result<()> {
            Ok(())
        }
    }

    const MODERATOR: i64 = 900;
    const AUTHOR: i64 = 100;

    fn channel() -> Destination {
        Destination::Channel("@uy_joy".into())
    }

    fn gate(
        store: Arc<FakeStore>,
        messenger: Arc<FakeMessenger>,
        admin_channel: Option<Destination>,
    ) -> ModerationGate {
        ModerationGate::new(
            store,
            messenger,
            ReviewConfig {
                moderators: vec![MODERATOR],
                channel: channel(),
                admin_channel,
                default_language: Language::Uz,
                max_photos: 10,
            },
        )
    }

    fn new_listing(photos: usize) -> NewListing {
        let l = sample_listing(0, AUTHOR);
        NewListing {
            title: l.title,
            description: l.description,
            property_type: l.property_type,
            status: l.status,
            is_makler: l.is_makler,
            region: l.region,
            district: l.district,
            full_address: l.full_address,
            price: l.price,
            area: l.area,
            contact_info: l.contact_info,
            photo_file_ids: (0..photos).map(|i| format!("photo-{i}")).collect(),
        }
    }

    #[tokio::test]
    async fn submit_stores_pending_and_reaches_moderators() {
        let store = Arc::new(FakeStore::default());
        let messenger = Arc::new(FakeMessenger::default());
        let admin = Destination::Channel("@uy_joy_admin".into());
        let gate = gate(store.clone(), messenger.clone(), Some(admin.clone()));

        let id = gate.submit(UserId(AUTHOR), &new_listing(12)).await.unwrap();

        let stored = store.listing(id.0).unwrap();
        assert_eq!(stored.approval_status, ApprovalStatus::Pending);
        assert!(!stored.is_approved);

        let posts = messenger.posts_to(&admin);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].photos.len(), 10);
        assert!(posts[0].keyboard.is_some());
        assert_eq!(
            messenger.texts_to(MODERATOR),
            vec![format!("🆕 Yangi e'lon #{id} tekshirishni kutmoqda.")]
        );
        assert_eq!(store.actions(), vec![ActivityAction::PostListing]);
    }

    #[tokio::test]
    async fn without_admin_channel_moderators_get_the_full_review() {
        let store = Arc::new(FakeStore::default());
        let messenger = Arc::new(FakeMessenger::default());
        let gate = gate(store, messenger.clone(), None);

        gate.submit(UserId(AUTHOR), &new_listing(2)).await.unwrap();

        let posts = messenger.posts_to(&Destination::Chat(ChatId(MODERATOR)));
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].photos, vec!["photo-0", "photo-1"]);
        assert!(posts[0].text.contains("YANGI E'LON"));
    }

    #[tokio::test]
    async fn approve_publishes_and_keeps_flags_in_sync() {
        let store = Arc::new(FakeStore::with(vec![sample_listing(5, AUTHOR)]));
        let messenger = Arc::new(FakeMessenger::default());
        let gate = gate(store.clone(), messenger.clone(), None);

        let outcome = gate.approve(UserId(MODERATOR), ListingId(5)).await.unwrap();
        assert!(outcome.published);

        let stored = store.listing(5).unwrap();
        assert_eq!(stored.approval_status, ApprovalStatus::Approved);
        assert!(stored.is_approved);
        assert!(stored.published_at.is_some());

        let posts = messenger.posts_to(&channel());
        assert_eq!(posts.len(), 1);
        assert!(posts[0].text.contains("#apartment #sale #makler"));
        assert!(posts[0].keyboard.is_none());
        assert_eq!(
            messenger.texts_to(AUTHOR),
            vec!["✅ E'loningiz tasdiqlandi va kanalga joylandi!".to_string()]
        );
    }

    #[tokio::test]
    async fn approval_survives_a_failed_channel_post() {
        let store = Arc::new(FakeStore::with(vec![sample_listing(5, AUTHOR)]));
        let messenger = Arc::new(FakeMessenger::failing_channel());
        let gate = gate(store.clone(), messenger, None);

        let outcome = gate.approve(UserId(MODERATOR), ListingId(5)).await.unwrap();
        assert!(!outcome.published);
        assert_eq!(
            store.listing(5).unwrap().approval_status,
            ApprovalStatus::Approved
        );
    }

    #[tokio::test]
    async fn only_moderators_review_and_only_once() {
        let store = Arc::new(FakeStore::with(vec![sample_listing(5, AUTHOR)]));
        let messenger = Arc::new(FakeMessenger::default());
        let gate = gate(store.clone(), messenger, None);

        let err = gate.approve(UserId(AUTHOR), ListingId(5)).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
        assert_eq!(
            store.listing(5).unwrap().approval_status,
            ApprovalStatus::Pending
        );

        gate.approve(UserId(MODERATOR), ListingId(5)).await.unwrap();
        let err = gate
            .reject(UserId(MODERATOR), ListingId(5), "kech")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));
        let err = gate.begin_reject(UserId(MODERATOR), ListingId(5)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));

        let err = gate.approve(UserId(MODERATOR), ListingId(77)).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn reject_sends_the_reason_verbatim() {
        let store = Arc::new(FakeStore::with(vec![sample_listing(5, AUTHOR)]));
        store
            .languages
            .lock()
            .unwrap()
            .insert(AUTHOR, Language::Uz);
        let messenger = Arc::new(FakeMessenger::default());
        let gate = gate(store.clone(), messenger.clone(), None);

        let err = gate.reject(UserId(MODERATOR), ListingId(5), "  ").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        gate.begin_reject(UserId(MODERATOR), ListingId(5)).await.unwrap();
        gate.reject(UserId(MODERATOR), ListingId(5), "narx noto'g'ri")
            .await
            .unwrap();

        let stored = store.listing(5).unwrap();
        assert_eq!(stored.approval_status, ApprovalStatus::Rejected);
        assert!(!stored.is_approved);

        let texts = messenger.texts_to(AUTHOR);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("narx noto'g'ri"));
        assert!(messenger.posts_to(&channel()).is_empty());

        let activity = store.activity.lock().unwrap();
        assert_eq!(activity[0].details["reason"], "narx noto'g'ri");
    }

    #[tokio::test]
    async fn delete_notifies_exactly_the_favoriting_users() {
        let store = Arc::new(FakeStore::with(vec![
            sample_listing(5, AUTHOR),
            sample_listing(6, AUTHOR),
        ]));
        {
            let mut favs = store.favorites.lock().unwrap();
            favs.insert((201, 5));
            favs.insert((202, 5));
            favs.insert((203, 6));
        }
        store.languages.lock().unwrap().insert(202, Language::Ru);
        let messenger = Arc::new(FakeMessenger::default());
        let gate = gate(store.clone(), messenger.clone(), None);

        let outcome = gate.delete(UserId(AUTHOR), ListingId(5)).await.unwrap();
        assert_eq!(outcome.notified, 2);

        assert!(store.listing(5).is_none());
        assert_eq!(
            *store.favorites.lock().unwrap(),
            HashSet::from([(203, 6)])
        );
        assert_eq!(messenger.texts_to(201).len(), 1);
        assert_eq!(
            messenger.texts_to(202),
            vec![i18n::text(Language::Ru, TextKey::FavoriteRemovedNotice).to_string()]
        );
        assert!(messenger.texts_to(203).is_empty());
    }

    #[tokio::test]
    async fn strangers_cannot_touch_a_listing() {
        let store = Arc::new(FakeStore::with(vec![sample_listing(5, AUTHOR)]));
        let messenger = Arc::new(FakeMessenger::default());
        let gate = gate(store.clone(), messenger.clone(), None);

        let err = gate.set_active(UserId(555), ListingId(5), false).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
        let err = gate.delete(UserId(555), ListingId(5)).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
        assert!(store.listing(5).unwrap().is_active);

        let listing = gate.set_active(UserId(AUTHOR), ListingId(5), false).await.unwrap();
        assert!(!listing.is_active);
        assert!(!store.listing(5).unwrap().is_active);

        // Moderators may manage any listing.
        gate.set_active(UserId(MODERATOR), ListingId(5), true).await.unwrap();
        assert!(store.listing(5).unwrap().is_active);
        assert!(messenger.sent().is_empty());
    }
}
