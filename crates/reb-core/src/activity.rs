//! User activity events (the `activity_log` table).

use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::{ListingId, UserId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Start,
    PostListing,
    Search,
    FavoriteAdd,
    Contact,
    LanguageChange,
    Approve,
    Reject,
    Activate,
    Deactivate,
    Delete,
}

impl ActivityAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityAction::Start => "start",
            ActivityAction::PostListing => "post_listing",
            ActivityAction::Search => "search",
            ActivityAction::FavoriteAdd => "favorite_add",
            ActivityAction::Contact => "contact",
            ActivityAction::LanguageChange => "language_change",
            ActivityAction::Approve => "approve",
            ActivityAction::Reject => "reject",
            ActivityAction::Activate => "activate",
            ActivityAction::Deactivate => "deactivate",
            ActivityAction::Delete => "delete",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActivityEvent {
    pub user_id: UserId,
    pub action: ActivityAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<ListingId>,
    pub details: Value,
}

impl ActivityEvent {
    pub fn new(user_id: UserId, action: ActivityAction) -> Self {
        Self {
            user_id,
            action,
            listing_id: None,
            details: json!({}),
        }
    }

    pub fn on_listing(mut self, listing_id: ListingId) -> Self {
        self.listing_id = Some(listing_id);
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    pub fn search(user_id: UserId, kind: &str, query: &str, results: i64) -> Self {
        Self::new(user_id, ActivityAction::Search).with_details(json!({
            "type": kind,
            "query": query,
            "results": results,
        }))
    }

    pub fn reject(moderator: UserId, listing_id: ListingId, reason: &str) -> Self {
        Self::new(moderator, ActivityAction::Reject)
            .on_listing(listing_id)
            .with_details(json!({ "reason": reason }))
    }
}
