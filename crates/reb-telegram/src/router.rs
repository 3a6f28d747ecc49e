use std::{collections::HashMap, sync::Arc, time::Duration};

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tokio::sync::{mpsc, Mutex, OwnedMutexGuard};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use reb_core::messaging::throttled::{ThrottleConfig, ThrottledMessenger};
use reb_core::{
    collector::{Batch, FlushFn, MediaGroupBuffer},
    config::Config,
    conversation::ConversationStore,
    domain::{ChatId, Language, UserId},
    messaging::port::MessagingPort,
    ports::{ListingStore, LocationFilter},
    review::{ModerationGate, ReviewConfig},
    security::RateLimiter,
};

use crate::handlers;
use crate::TelegramMessenger;

/// How often idle conversations and stale rate-limit buckets are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// The last search a chat ran, replayed when a result page is requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchQuery {
    Keyword(String),
    Location(LocationFilter),
}

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub store: Arc<dyn ListingStore>,
    pub messenger: Arc<dyn MessagingPort>,
    pub gate: Arc<ModerationGate>,
    pub conversations: Arc<ConversationStore>,
    pub collector: Arc<MediaGroupBuffer<String>>,
    pub rate_limiter: Arc<Mutex<RateLimiter>>,
    pub chat_locks: Arc<ChatLocks>,
    pub searches: Arc<LastSearches>,
    pub throttle: Arc<ThrottledMessenger>,
}

impl AppState {
    /// Stored preference, or the configured default for unknown users and lookup failures.
    pub async fn language_of(&self, user: UserId) -> Language {
        match self.store.user_language(user).await {
            Ok(Some(lang)) => lang,
            Ok(None) => self.cfg.default_language,
            Err(e) => {
                tracing::warn!(user = user.0, error = %e, "language lookup failed");
                self.cfg.default_language
            }
        }
    }
}

/// The last search of each chat, replayed for paging.
///
/// A search leaves no conversation behind, so entries keep their own clock and expire on it.
#[derive(Default)]
pub struct LastSearches {
    inner: Mutex<HashMap<ChatId, (SearchQuery, Instant)>>,
}

impl LastSearches {
    pub async fn remember(&self, chat_id: ChatId, query: SearchQuery) {
        self.inner
            .lock()
            .await
            .insert(chat_id, (query, Instant::now()));
    }

    /// The chat's last search; paging through it keeps it alive.
    pub async fn get(&self, chat_id: ChatId) -> Option<SearchQuery> {
        let mut map = self.inner.lock().await;
        let (query, touched) = map.get_mut(&chat_id)?;
        *touched = Instant::now();
        Some(query.clone())
    }

    pub async fn forget(&self, chat_id: ChatId) -> bool {
        self.inner.lock().await.remove(&chat_id).is_some()
    }

    /// Drop searches untouched for longer than `max_idle`; returns how many went.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut map = self.inner.lock().await;
        let before = map.len();
        map.retain(|_, (_, touched)| now.duration_since(*touched) <= max_idle);
        before - map.len()
    }
}

#[derive(Default)]
pub struct ChatLocks {
    inner: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl ChatLocks {
    pub async fn lock_chat(&self, chat_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(chat_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Forget chats nobody is holding or waiting on.
    pub async fn prune(&self) {
        let mut map = self.inner.lock().await;
        map.retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}

pub async fn run_polling(cfg: Arc<Config>, store: Arc<dyn ListingStore>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.bot_token.clone());

    match bot.get_me().await {
        Ok(me) => tracing::info!(
            username = %me.username(),
            moderators = cfg.moderator_ids.len(),
            channel = %cfg.channel,
            "bot started"
        ),
        Err(e) => tracing::warn!(error = %e, "get_me failed"),
    }

    // The throttling decorator keeps bursts (albums, moderator fan-out) under Telegram's flood
    // limits. A single RetryAfter retry still lives in the Telegram adapter.
    let raw_messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let throttle = Arc::new(ThrottledMessenger::new(
        raw_messenger,
        ThrottleConfig::default(),
    ));
    let messenger: Arc<dyn MessagingPort> = throttle.clone();

    let gate = Arc::new(ModerationGate::new(
        store.clone(),
        messenger.clone(),
        ReviewConfig::from(cfg.as_ref()),
    ));

    // Flushed media groups go through a channel: the flush callback cannot hold the state
    // that owns the collector.
    let (batch_tx, mut batch_rx) = mpsc::unbounded_channel::<Batch<String>>();
    let flush: FlushFn<String> = Arc::new(move |batch| {
        let tx = batch_tx.clone();
        Box::pin(async move {
            if tx.send(batch).is_err() {
                tracing::warn!("media group flushed after shutdown");
            }
        })
    });
    let collector = MediaGroupBuffer::new(cfg.media_group_timeout, flush);

    let state = Arc::new(AppState {
        cfg: cfg.clone(),
        store,
        messenger,
        gate,
        conversations: Arc::new(ConversationStore::new()),
        collector,
        rate_limiter: Arc::new(Mutex::new(RateLimiter::new(
            cfg.rate_limit_enabled,
            cfg.rate_limit_requests,
            cfg.rate_limit_window,
        ))),
        chat_locks: Arc::new(ChatLocks::default()),
        searches: Arc::new(LastSearches::default()),
        throttle,
    });

    {
        let state = state.clone();
        tokio::spawn(async move {
            while let Some(batch) = batch_rx.recv().await {
                tokio::spawn(handlers::photo::apply_batch(state.clone(), batch));
            }
        });
    }

    let shutdown = CancellationToken::new();
    tokio::spawn(sweep_idle(state.clone(), shutdown.clone()));

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    shutdown.cancel();
    tracing::info!("dispatcher stopped");
    Ok(())
}

/// Periodically drop idle conversations (and their unflushed photos), stale searches, full
/// rate buckets and unused throttle lanes.
async fn sweep_idle(state: Arc<AppState>, shutdown: CancellationToken) {
    let mut tick = tokio::time::interval(SWEEP_INTERVAL);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = tick.tick() => {}
        }

        let expired = state
            .conversations
            .evict_idle(state.cfg.draft_idle_timeout)
            .await;
        for chat in &expired {
            let dropped = state.collector.discard_owner(*chat).await;
            tracing::info!(chat_id = chat.0, dropped_photos = dropped, "idle conversation expired");
        }

        let searches = state.searches.evict_idle(state.cfg.draft_idle_timeout).await;
        let pruned = state.rate_limiter.lock().await.prune();
        let lanes = state.throttle.prune_idle().await;
        state.chat_locks.prune().await;
        if !expired.is_empty() || searches > 0 || pruned > 0 {
            tracing::debug!(expired = expired.len(), searches, pruned, lanes, "idle sweep");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn chat_locks_serialize_one_chat_only() {
        let locks = ChatLocks::default();
        let held = locks.lock_chat(1).await;

        // Another chat is not blocked.
        let other = tokio::time::timeout(Duration::from_millis(50), locks.lock_chat(2)).await;
        assert!(other.is_ok());

        // The same chat waits until the guard is dropped.
        let same = tokio::time::timeout(Duration::from_millis(50), locks.lock_chat(1)).await;
        assert!(same.is_err());
        drop(held);
        let same = tokio::time::timeout(Duration::from_millis(50), locks.lock_chat(1)).await;
        assert!(same.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn searches_expire_on_their_own_clock() {
        let searches = LastSearches::default();
        let idle = Duration::from_secs(1800);
        searches
            .remember(ChatId(1), SearchQuery::Location(LocationFilter::region("samarkand")))
            .await;
        searches
            .remember(ChatId(2), SearchQuery::Keyword("hovli".into()))
            .await;

        tokio::time::advance(Duration::from_secs(1000)).await;
        // Paging keeps chat 2's search alive.
        assert_eq!(
            searches.get(ChatId(2)).await,
            Some(SearchQuery::Keyword("hovli".into()))
        );

        tokio::time::advance(Duration::from_secs(1000)).await;
        assert_eq!(searches.evict_idle(idle).await, 1);
        assert_eq!(searches.get(ChatId(1)).await, None);
        assert!(searches.get(ChatId(2)).await.is_some());

        assert!(searches.forget(ChatId(2)).await);
        assert_eq!(searches.evict_idle(idle).await, 0);
    }

    #[tokio::test]
    async fn prune_keeps_held_locks() {
        let locks = ChatLocks::default();
        let _held = locks.lock_chat(1).await;
        drop(locks.lock_chat(2).await);

        locks.prune().await;
        let map = locks.inner.lock().await;
        assert!(map.contains_key(&1));
        assert!(!map.contains_key(&2));
    }
}
