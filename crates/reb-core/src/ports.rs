use async_trait::async_trait;

use crate::{
    activity::ActivityEvent,
    domain::{
        ApprovalStatus, DealStatus, Language, Listing, ListingId, NewListing, Page, Paged,
        PropertyType, UserId, UserProfile,
    },
    Result,
};

/// Filters for the location search. `district: None` searches the whole region.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocationFilter {
    pub region: Option<String>,
    pub district: Option<String>,
    pub property_type: Option<PropertyType>,
    pub status: Option<DealStatus>,
}

impl LocationFilter {
    pub fn region(region: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            ..Self::default()
        }
    }

    pub fn district(region: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            district: Some(district.into()),
            ..Self::default()
        }
    }
}

/// Persistence port for users, listings, favorites and the activity log.
///
/// Search and favorites only return public listings (approved and active).
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Create the user on first contact, refresh the names afterwards.
    /// `language` is only used when the row is created.
    async fn upsert_user(&self, profile: &UserProfile, language: Language) -> Result<()>;

    async fn user_language(&self, user: UserId) -> Result<Option<Language>>;

    async fn set_user_language(&self, user: UserId, language: Language) -> Result<()>;

    /// Insert a listing as pending / not approved / active.
    async fn insert_listing(&self, author: UserId, listing: &NewListing) -> Result<ListingId>;

    async fn get_listing(&self, id: ListingId) -> Result<Option<Listing>>;

    /// Pending listings, oldest first.
    async fn pending_listings(&self, limit: i64) -> Result<Vec<Listing>>;

    async fn count_pending(&self) -> Result<i64>;

    /// Move a pending listing to `status`. Keeps `is_approved` in sync and stamps
    /// `published_at` on approval. Returns `false` when the listing was not pending.
    async fn set_approval(&self, id: ListingId, status: ApprovalStatus) -> Result<bool>;

    async fn set_active(&self, id: ListingId, active: bool) -> Result<()>;

    /// Delete the listing and its favorites atomically. Returns the users who had it saved.
    async fn delete_listing(&self, id: ListingId) -> Result<Vec<UserId>>;

    /// Returns `false` when the favorite already existed.
    async fn add_favorite(&self, user: UserId, id: ListingId) -> Result<bool>;

    async fn favorites(&self, user: UserId, page: Page) -> Result<Paged<Listing>>;

    /// All listings of one author regardless of status, newest first.
    async fn user_listings(&self, author: UserId, page: Page) -> Result<Paged<Listing>>;

    async fn search_keyword(&self, query: &str, page: Page) -> Result<Paged<Listing>>;

    async fn search_location(&self, filter: &LocationFilter, page: Page)
        -> Result<Paged<Listing>>;

    async fn log_activity(&self, event: &ActivityEvent) -> Result<()>;
}
