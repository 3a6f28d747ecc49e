//! Per-chat conversation state, kept in memory with an idle expiry.

use std::{collections::HashMap, time::Duration};

use tokio::{sync::Mutex, time::Instant};

use crate::{
    domain::{ChatId, ListingId},
    draft::FormState,
};

/// What the bot expects next from a chat.
#[derive(Clone, Debug, PartialEq)]
pub enum Conversation {
    /// Filling in the listing form. Terminal form states are never stored.
    Posting(FormState),
    /// The next text message is a keyword query.
    AwaitingSearchQuery,
    /// A moderator's next text message is the rejection reason for this listing.
    AwaitingRejectReason { listing_id: ListingId },
}

struct Entry {
    conversation: Conversation,
    touched: Instant,
}

#[derive(Default)]
pub struct ConversationStore {
    inner: Mutex<HashMap<ChatId, Entry>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, chat_id: ChatId) -> Option<Conversation> {
        self.inner
            .lock()
            .await
            .get(&chat_id)
            .map(|e| e.conversation.clone())
    }

    /// Store `conversation`; a terminal form state clears the chat instead.
    pub async fn set(&self, chat_id: ChatId, conversation: Conversation) {
        let mut map = self.inner.lock().await;
        if matches!(&conversation, Conversation::Posting(form) if form.is_terminal()) {
            map.remove(&chat_id);
            return;
        }
        map.insert(
            chat_id,
            Entry {
                conversation,
                touched: Instant::now(),
            },
        );
    }

    pub async fn clear(&self, chat_id: ChatId) -> Option<Conversation> {
        self.inner
            .lock()
            .await
            .remove(&chat_id)
            .map(|e| e.conversation)
    }

    /// Drop conversations untouched for longer than `max_idle`; returns the evicted chats.
    pub async fn evict_idle(&self, max_idle: Duration) -> Vec<ChatId> {
        let now = Instant::now();
        let mut map = self.inner.lock().await;
        let expired: Vec<ChatId> = map
            .iter()
            .filter(|(_, e)| now.duration_since(e.touched) > max_idle)
            .map(|(chat, _)| *chat)
            .collect();
        for chat in &expired {
            map.remove(chat);
        }
        expired
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{transition, FormEvent};

    #[tokio::test]
    async fn terminal_forms_are_not_stored() {
        let store = ConversationStore::new();
        let chat = ChatId(1);
        let (form, _) = FormState::start();
        store.set(chat, Conversation::Posting(form.clone())).await;
        assert!(store.get(chat).await.is_some());

        let (cancelled, _) = transition(form, FormEvent::Cancel);
        store.set(chat, Conversation::Posting(cancelled)).await;
        assert!(store.get(chat).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn evicts_only_idle_chats() {
        let store = ConversationStore::new();
        store.set(ChatId(1), Conversation::AwaitingSearchQuery).await;
        tokio::time::advance(Duration::from_secs(20 * 60)).await;
        store.set(ChatId(2), Conversation::AwaitingSearchQuery).await;
        tokio::time::advance(Duration::from_secs(15 * 60)).await;

        let evicted = store.evict_idle(Duration::from_secs(30 * 60)).await;
        assert_eq!(evicted, vec![ChatId(1)]);
        assert_eq!(store.len().await, 1);
        assert_eq!(
            store.get(ChatId(2)).await,
            Some(Conversation::AwaitingSearchQuery)
        );
    }
}
