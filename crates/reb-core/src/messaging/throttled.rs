use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::{
    domain::{ChatId, Destination, MessageRef},
    messaging::{
        port::MessagingPort,
        types::{InlineKeyboard, MessagingCapabilities, Post},
    },
    Result,
};

#[derive(Clone, Copy, Debug)]
pub struct ThrottleConfig {
    /// Minimum spacing between any two Bot API calls.
    pub global_min_interval: Duration,
    /// Minimum spacing between calls into one chat.
    pub per_chat_min_interval: Duration,
    /// Minimum spacing between posts into one channel (Telegram allows ~20/min in groups).
    pub per_channel_min_interval: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            global_min_interval: Duration::from_millis(40),
            per_chat_min_interval: Duration::from_millis(1050),
            per_channel_min_interval: Duration::from_millis(3000),
        }
    }
}

#[derive(Debug)]
struct IntervalLimiter {
    interval: Duration,
    next: Instant,
}

impl IntervalLimiter {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Instant::now(),
        }
    }

    /// Reserve the next slot and return the wait duration required before executing.
    fn reserve(&mut self) -> Duration {
        let now = Instant::now();
        let start = if now >= self.next { now } else { self.next };
        self.next = start + self.interval;
        start.saturating_duration_since(now)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum LaneKey {
    Chat(i64),
    Channel(String),
}

/// MessagingPort decorator that spaces outbound calls per chat and globally.
///
/// Album posts count once per photo against the destination lane, since Telegram bills
/// each media item as a message.
pub struct ThrottledMessenger {
    inner: Arc<dyn MessagingPort>,
    cfg: ThrottleConfig,
    global: Mutex<IntervalLimiter>,
    lanes: Mutex<HashMap<LaneKey, Arc<Mutex<IntervalLimiter>>>>,
}

impl ThrottledMessenger {
    pub fn new(inner: Arc<dyn MessagingPort>, cfg: ThrottleConfig) -> Self {
        Self {
            inner,
            cfg,
            global: Mutex::new(IntervalLimiter::new(cfg.global_min_interval)),
            lanes: Mutex::new(HashMap::new()),
        }
    }

    async fn lane(&self, key: LaneKey) -> Arc<Mutex<IntervalLimiter>> {
        let interval = match key {
            LaneKey::Chat(_) => self.cfg.per_chat_min_interval,
            LaneKey::Channel(_) => self.cfg.per_channel_min_interval,
        };
        let mut map = self.lanes.lock().await;
        map.entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(IntervalLimiter::new(interval))))
            .clone()
    }

    async fn throttle_lane(&self, key: LaneKey, slots: usize) {
        let mut wait = Duration::ZERO;
        let lane = self.lane(key).await;
        for _ in 0..slots.max(1) {
            let global_wait = self.global.lock().await.reserve();
            let lane_wait = lane.lock().await.reserve();
            wait = wait.max(global_wait).max(lane_wait);
        }
        if !wait.is_zero() {
            sleep(wait).await;
        }
    }

    async fn throttle_chat(&self, chat_id: i64) {
        self.throttle_lane(LaneKey::Chat(chat_id), 1).await;
    }

    /// Messages the adapter needs for `html` once it is split at the message limit.
    fn text_slots(&self, html: &str) -> usize {
        let max = self.inner.capabilities().max_message_len.max(1);
        html.chars().count().div_ceil(max).max(1)
    }

    /// Forget lanes whose last reserved slot is already in the past.
    pub async fn prune_idle(&self) -> usize {
        let now = Instant::now();
        let mut map = self.lanes.lock().await;
        let before = map.len();
        map.retain(|_, lane| {
            Arc::strong_count(lane) > 1 || lane.try_lock().map_or(true, |l| l.next > now)
        });
        before - map.len()
    }

    async fn throttle_global(&self) {
        let wait = { self.global.lock().await.reserve() };
        if !wait.is_zero() {
            sleep(wait).await;
        }
    }
}

#[async_trait::async_trait]
impl MessagingPort for ThrottledMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        self.inner.capabilities()
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        self.throttle_lane(LaneKey::Chat(chat_id.0), self.text_slots(html))
            .await;
        self.inner.send_html(chat_id, html).await
    }

    async fn send_inline_keyboard(
        &self,
        chat_id: ChatId,
        html: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef> {
        self.throttle_lane(LaneKey::Chat(chat_id.0), self.text_slots(html))
            .await;
        self.inner
            .send_inline_keyboard(chat_id, html, keyboard)
            .await
    }

    async fn edit_html(&self, msg: MessageRef, html: &str) -> Result<()> {
        self.throttle_chat(msg.chat_id.0).await;
        self.inner.edit_html(msg, html).await
    }

    async fn edit_inline_keyboard(
        &self,
        msg: MessageRef,
        html: &str,
        keyboard: InlineKeyboard,
    ) -> Result<()> {
        self.throttle_chat(msg.chat_id.0).await;
        self.inner.edit_inline_keyboard(msg, html, keyboard).await
    }

    async fn delete_message(&self, msg: MessageRef) -> Result<()> {
        self.throttle_chat(msg.chat_id.0).await;
        self.inner.delete_message(msg).await
    }

    async fn post(&self, dest: &Destination, post: &Post) -> Result<Vec<MessageRef>> {
        let key = match dest {
            Destination::Chat(chat) => LaneKey::Chat(chat.0),
            Destination::Channel(name) => LaneKey::Channel(name.clone()),
        };
        let slots = post.photos.len() + usize::from(post.keyboard.is_some());
        self.throttle_lane(key, slots).await;
        self.inner.post(dest, post).await
    }

    async fn answer_callback_query(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()> {
        // Callback answers are not bound to a chat lane.
        self.throttle_global().await;
        self.inner
            .answer_callback_query(callback_id, text, show_alert)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct Recorder {
        calls: StdMutex<Vec<(&'static str, Instant)>>,
    }

    impl Recorder {
        fn record(&self, name: &'static str) {
            self.calls.lock().unwrap().push((name, Instant::now()));
        }
    }

    fn msg(chat: i64) -> MessageRef {
        MessageRef {
            chat_id: ChatId(chat),
            message_id: crate::domain::MessageId(1),
        }
    }

    #[async_trait::async_trait]
    impl MessagingPort for Recorder {
        fn capabilities(&self) -> MessagingCapabilities {
            MessagingCapabilities {
                supports_html: true,
                supports_edit: true,
                max_message_len: 4096,
                max_caption_len: 1024,
                max_album_size: 10,
            }
        }
        async fn send_html(&self, chat_id: ChatId, _html: &str) -> Result<MessageRef> {
            self.record("send_html");
            Ok(msg(chat_id.0))
        }
        async fn send_inline_keyboard(
            &self,
            chat_id: ChatId,
            _html: &str,
            _keyboard: InlineKeyboard,
        ) -> Result<MessageRef> {
            self.record("send_inline_keyboard");
            Ok(msg(chat_id.0))
        }
        async fn edit_html(&self, _msg: MessageRef, _html: &str) -> Result<()> {
            self.record("edit_html");
            Ok(())
        }
        async fn edit_inline_keyboard(
            &self,
            _msg: MessageRef,
            _html: &str,
            _keyboard: InlineKeyboard,
        ) -> Result<()> {
            self.record("edit_inline_keyboard");
            Ok(())
        }
        async fn delete_message(&self, _msg: MessageRef) -> Result<()> {
            self.record("delete_message");
            Ok(())
        }
        async fn post(&self, _dest: &Destination, _post: &Post) -> Result<Vec<MessageRef>> {
            self.record("post");
            Ok(vec![])
        }
        async fn answer_callback_query(
            &self,
            _callback_id: &str,
            _text: Option<&str>,
            _show_alert: bool,
        ) -> Result<()> {
            self.record("answer_callback_query");
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn spaces_calls_into_the_same_chat() {
        let rec = Arc::new(Recorder::default());
        let throttled = ThrottledMessenger::new(rec.clone(), ThrottleConfig::default());
        let start = Instant::now();

        throttled.send_html(ChatId(1), "a").await.unwrap();
        throttled.send_html(ChatId(1), "b").await.unwrap();
        throttled.send_html(ChatId(2), "c").await.unwrap();

        let calls = rec.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].1, start);
        assert!(calls[1].1 - start >= Duration::from_millis(1050));
        // A different chat only waits for the global slot.
        assert!(calls[2].1 - calls[1].1 < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn long_text_reserves_a_slot_per_message() {
        let rec = Arc::new(Recorder::default());
        let throttled = ThrottledMessenger::new(rec.clone(), ThrottleConfig::default());
        let start = Instant::now();

        throttled
            .send_html(ChatId(1), &"x".repeat(5000))
            .await
            .unwrap();
        throttled.send_html(ChatId(1), "b").await.unwrap();

        let calls = rec.calls.lock().unwrap();
        assert!(calls[0].1 - start >= Duration::from_millis(1050));
        assert!(calls[1].1 - start >= Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_lanes_are_pruned() {
        let rec = Arc::new(Recorder::default());
        let throttled = ThrottledMessenger::new(rec, ThrottleConfig::default());
        throttled.send_html(ChatId(1), "a").await.unwrap();
        throttled.send_html(ChatId(2), "b").await.unwrap();

        // Both lanes still hold a reserved slot in the future.
        assert_eq!(throttled.prune_idle().await, 0);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(throttled.prune_idle().await, 2);
        assert!(throttled.lanes.lock().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn albums_reserve_a_slot_per_photo() {
        let rec = Arc::new(Recorder::default());
        let throttled = ThrottledMessenger::new(rec.clone(), ThrottleConfig::default());
        let dest = Destination::Channel("@listings".into());
        let photos: Vec<String> = (0..3).map(|i| format!("f{i}")).collect();
        let start = Instant::now();

        throttled
            .post(&dest, &Post::new("a", &photos, 10))
            .await
            .unwrap();
        throttled
            .post(&dest, &Post::new("b", &[], 10))
            .await
            .unwrap();

        let calls = rec.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        // First post waited for its own third slot; the next one queues behind all three.
        assert!(calls[0].1 - start >= Duration::from_millis(6000));
        assert!(calls[1].1 - start >= Duration::from_millis(9000));
    }
}
