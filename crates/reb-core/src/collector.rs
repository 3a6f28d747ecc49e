//! Debounced batch accumulator for Telegram media groups.
//!
//! Photos of one album arrive as separate updates sharing a `media_group_id`. Each arrival
//! re-arms the group's timer; when the window passes without a new item the whole batch is
//! handed to the flush callback once, in arrival order.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::domain::ChatId;

pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
pub type FlushFn<T> = Arc<dyn Fn(Batch<T>) -> BoxFuture + Send + Sync>;

/// A completed media group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch<T> {
    pub owner: ChatId,
    pub group_id: String,
    pub items: Vec<T>,
}

/// What happened to a submitted item.
#[derive(Debug, PartialEq, Eq)]
pub enum Submission<T> {
    /// No group id: the caller applies the item right away.
    Immediate(T),
    /// Held until the group's window passes; `len` items are buffered so far.
    Buffered { len: usize },
}

struct PendingGroup<T> {
    seq: u64,
    items: Vec<T>,
    cancel: CancellationToken,
}

// Keyed by owner as well, so equal group ids from two chats never merge.
type GroupKey = (ChatId, String);

pub struct MediaGroupBuffer<T> {
    window: Duration,
    flush: FlushFn<T>,
    next_seq: AtomicU64,
    pending: Mutex<HashMap<GroupKey, PendingGroup<T>>>,
}

impl<T: Send + 'static> MediaGroupBuffer<T> {
    pub fn new(window: Duration, flush: FlushFn<T>) -> Arc<Self> {
        Arc::new(Self {
            window,
            flush,
            next_seq: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
        })
    }

    pub async fn submit(
        self: &Arc<Self>,
        owner: ChatId,
        item: T,
        group_id: Option<String>,
    ) -> Submission<T> {
        let Some(group_id) = group_id else {
            return Submission::Immediate(item);
        };

        let key = (owner, group_id);
        let cancel = CancellationToken::new();
        let len = {
            let mut map = self.pending.lock().await;
            match map.get_mut(&key) {
                Some(group) => {
                    group.items.push(item);
                    // Re-arm: the old timer must not flush.
                    group.cancel.cancel();
                    group.cancel = cancel.clone();
                    group.items.len()
                }
                None => {
                    let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                    map.insert(
                        key.clone(),
                        PendingGroup {
                            seq,
                            items: vec![item],
                            cancel: cancel.clone(),
                        },
                    );
                    1
                }
            }
        };

        tracing::debug!(chat_id = owner.0, group_id = %key.1, len, "media group item buffered");
        self.spawn_timer(key, cancel);
        Submission::Buffered { len }
    }

    fn spawn_timer(self: &Arc<Self>, key: GroupKey, cancel: CancellationToken) {
        let buffer = Arc::clone(self);
        let window = self.window;
        tokio::spawn(async move {
            tokio::select! {
              _ = cancel.cancelled() => {}
              _ = tokio::time::sleep(window) => {
                buffer.fire(key, &cancel).await;
              }
            }
        });
    }

    async fn fire(&self, key: GroupKey, cancel: &CancellationToken) {
        let group = {
            let mut map = self.pending.lock().await;
            // An item may have re-armed the group while this timer waited for the lock.
            if cancel.is_cancelled() {
                return;
            }
            map.remove(&key)
        };
        let Some(group) = group else {
            return;
        };

        let (owner, group_id) = key;
        tracing::debug!(chat_id = owner.0, group_id = %group_id, items = group.items.len(), "media group flushed");
        (self.flush)(Batch {
            owner,
            group_id,
            items: group.items,
        })
        .await;
    }

    /// Remove every group still waiting for `owner`, without calling the flush callback.
    ///
    /// Used to flush early ("done" pressed mid-burst). Batches come back oldest first.
    pub async fn take_owner(&self, owner: ChatId) -> Vec<Batch<T>> {
        let mut taken = {
            let mut map = self.pending.lock().await;
            let keys: Vec<GroupKey> = map.keys().filter(|(o, _)| *o == owner).cloned().collect();
            keys.into_iter()
                .filter_map(|key| map.remove(&key).map(|g| (key, g)))
                .collect::<Vec<_>>()
        };
        taken.sort_by_key(|(_, g)| g.seq);

        taken
            .into_iter()
            .map(|((owner, group_id), group)| {
                group.cancel.cancel();
                Batch {
                    owner,
                    group_id,
                    items: group.items,
                }
            })
            .collect()
    }

    /// Drop pending groups of `owner` (conversation cancelled or expired). Returns the item count.
    pub async fn discard_owner(&self, owner: ChatId) -> usize {
        self.take_owner(owner)
            .await
            .iter()
            .map(|b| b.items.len())
            .sum()
    }

    pub async fn pending_groups(&self) -> usize {
        self.pending.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use tokio::time::sleep;

    type Flushed = Arc<StdMutex<Vec<Batch<&'static str>>>>;

    fn buffer(window_ms: u64) -> (Arc<MediaGroupBuffer<&'static str>>, Flushed) {
        let flushed: Flushed = Arc::new(StdMutex::new(Vec::new()));
        let sink = flushed.clone();
        let flush: FlushFn<&'static str> = Arc::new(move |batch| {
            let sink = sink.clone();
            Box::pin(async move {
                sink.lock().unwrap().push(batch);
            })
        });
        (MediaGroupBuffer::new(Duration::from_millis(window_ms), flush), flushed)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_flushes_once_in_arrival_order() {
        let (buf, flushed) = buffer(1000);
        let chat = ChatId(1);

        assert_eq!(
            buf.submit(chat, "p1", Some("g".into())).await,
            Submission::Buffered { len: 1 }
        );
        sleep(Duration::from_millis(200)).await;
        assert_eq!(
            buf.submit(chat, "p2", Some("g".into())).await,
            Submission::Buffered { len: 2 }
        );

        sleep(Duration::from_millis(1100)).await;

        let flushed = flushed.lock().unwrap();
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].items, vec!["p1", "p2"]);
        assert_eq!(flushed[0].owner, chat);
    }

    #[tokio::test(start_paused = true)]
    async fn each_arrival_rearms_the_window() {
        let (buf, flushed) = buffer(1000);
        let chat = ChatId(1);

        buf.submit(chat, "p1", Some("g".into())).await;
        sleep(Duration::from_millis(900)).await;
        buf.submit(chat, "p2", Some("g".into())).await;
        sleep(Duration::from_millis(600)).await;
        assert!(flushed.lock().unwrap().is_empty());

        sleep(Duration::from_millis(500)).await;
        assert_eq!(flushed.lock().unwrap().len(), 1);
        assert_eq!(buf.pending_groups().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn ungrouped_items_are_immediate() {
        let (buf, flushed) = buffer(1000);
        assert_eq!(
            buf.submit(ChatId(1), "solo", None).await,
            Submission::Immediate("solo")
        );
        sleep(Duration::from_millis(2000)).await;
        assert!(flushed.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn groups_and_chats_stay_separate() {
        let (buf, flushed) = buffer(1000);

        buf.submit(ChatId(1), "a1", Some("g1".into())).await;
        buf.submit(ChatId(1), "b1", Some("g2".into())).await;
        buf.submit(ChatId(2), "c1", Some("g1".into())).await;
        buf.submit(ChatId(1), "a2", Some("g1".into())).await;

        sleep(Duration::from_millis(1500)).await;

        let mut flushed = flushed.lock().unwrap().clone();
        flushed.sort_by(|a, b| (a.owner.0, &a.group_id).cmp(&(b.owner.0, &b.group_id)));
        assert_eq!(flushed.len(), 3);
        assert_eq!(flushed[0].items, vec!["a1", "a2"]);
        assert_eq!(flushed[1].items, vec!["b1"]);
        assert_eq!(flushed[2].items, vec!["c1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn take_owner_flushes_early_and_cancels_timers() {
        let (buf, flushed) = buffer(1000);
        let chat = ChatId(9);

        buf.submit(chat, "x1", Some("first".into())).await;
        buf.submit(chat, "y1", Some("second".into())).await;
        buf.submit(chat, "x2", Some("first".into())).await;
        buf.submit(ChatId(10), "other", Some("first".into())).await;

        let taken = buf.take_owner(chat).await;
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].group_id, "first");
        assert_eq!(taken[0].items, vec!["x1", "x2"]);
        assert_eq!(taken[1].items, vec!["y1"]);

        sleep(Duration::from_millis(1500)).await;
        let flushed = flushed.lock().unwrap();
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].owner, ChatId(10));
    }
}
