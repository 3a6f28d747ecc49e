//! `ListingStore` over PostgreSQL.

use async_trait::async_trait;
use reb_core::{
    activity::ActivityEvent,
    domain::{
        ApprovalStatus, Language, Listing, ListingId, NewListing, Page, Paged, UserId, UserProfile,
    },
    ports::{ListingStore, LocationFilter},
    Error, Result,
};

use crate::{
    models::{into_listings, ListingRow},
    repositories::{
        listing_repo::{CreateListing, LocationQuery},
        ActivityRepo, FavoriteRepo, ListingRepo, UserRepo,
    },
    DbPool,
};

fn storage(err: sqlx::Error) -> Error {
    Error::Storage(err.to_string())
}

fn paged(result: (Vec<ListingRow>, i64), page: Page) -> Result<Paged<Listing>> {
    let (rows, total) = result;
    Ok(Paged {
        items: into_listings(rows)?,
        total,
        page,
    })
}

#[derive(Clone)]
pub struct PgListingStore {
    pool: DbPool,
}

impl PgListingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ListingStore for PgListingStore {
    async fn upsert_user(&self, profile: &UserProfile, language: Language) -> Result<()> {
        UserRepo::upsert(
            &self.pool,
            profile.user_id.0,
            profile.username.as_deref(),
            profile.first_name.as_deref(),
            profile.last_name.as_deref(),
            language.code(),
        )
        .await
        .map_err(storage)
    }

    async fn user_language(&self, user: UserId) -> Result<Option<Language>> {
        let code = UserRepo::find_language(&self.pool, user.0)
            .await
            .map_err(storage)?;
        Ok(code.as_deref().and_then(Language::from_code))
    }

    async fn set_user_language(&self, user: UserId, language: Language) -> Result<()> {
        UserRepo::set_language(&self.pool, user.0, language.code())
            .await
            .map_err(storage)
    }

    async fn insert_listing(&self, author: UserId, listing: &NewListing) -> Result<ListingId> {
        let input = CreateListing {
            author_telegram_id: author.0,
            title: &listing.title,
            description: &listing.description,
            property_type: listing.property_type.as_str(),
            status: listing.status.as_str(),
            is_makler: listing.is_makler,
            region: &listing.region,
            district: &listing.district,
            full_address: &listing.full_address,
            price: listing.price,
            area: listing.area,
            contact_info: &listing.contact_info,
            photo_file_ids: &listing.photo_file_ids,
        };
        let id = ListingRepo::create(&self.pool, &input)
            .await
            .map_err(storage)?;
        Ok(ListingId(id))
    }

    async fn get_listing(&self, id: ListingId) -> Result<Option<Listing>> {
        ListingRepo::find_by_id(&self.pool, id.0)
            .await
            .map_err(storage)?
            .map(Listing::try_from)
            .transpose()
    }

    async fn pending_listings(&self, limit: i64) -> Result<Vec<Listing>> {
        let rows = ListingRepo::list_pending(&self.pool, limit)
            .await
            .map_err(storage)?;
        into_listings(rows)
    }

    async fn count_pending(&self) -> Result<i64> {
        ListingRepo::count_pending(&self.pool)
            .await
            .map_err(storage)
    }

    async fn set_approval(&self, id: ListingId, status: ApprovalStatus) -> Result<bool> {
        if status == ApprovalStatus::Pending {
            return Err(Error::InvalidTransition(
                "a listing cannot be moved back to pending".into(),
            ));
        }
        ListingRepo::set_approval(&self.pool, id.0, status.as_str(), status.is_approved())
            .await
            .map_err(storage)
    }

    async fn set_active(&self, id: ListingId, active: bool) -> Result<()> {
        ListingRepo::set_active(&self.pool, id.0, active)
            .await
            .map_err(storage)
    }

    async fn delete_listing(&self, id: ListingId) -> Result<Vec<UserId>> {
        let users = ListingRepo::delete_with_favorites(&self.pool, id.0)
            .await
            .map_err(storage)?;
        Ok(users.into_iter().map(UserId).collect())
    }

    async fn add_favorite(&self, user: UserId, id: ListingId) -> Result<bool> {
        FavoriteRepo::add(&self.pool, user.0, id.0)
            .await
            .map_err(storage)
    }

    async fn favorites(&self, user: UserId, page: Page) -> Result<Paged<Listing>> {
        let result = FavoriteRepo::list_for_user(&self.pool, user.0, page.limit(), page.offset())
            .await
            .map_err(storage)?;
        paged(result, page)
    }

    async fn user_listings(&self, author: UserId, page: Page) -> Result<Paged<Listing>> {
        let result = ListingRepo::list_for_author(&self.pool, author.0, page.limit(), page.offset())
            .await
            .map_err(storage)?;
        paged(result, page)
    }

    async fn search_keyword(&self, query: &str, page: Page) -> Result<Paged<Listing>> {
        let result = ListingRepo::search_keyword(&self.pool, query, page.limit(), page.offset())
            .await
            .map_err(storage)?;
        paged(result, page)
    }

    async fn search_location(
        &self,
        filter: &LocationFilter,
        page: Page,
    ) -> Result<Paged<Listing>> {
        let query = LocationQuery {
            region: filter.region.as_deref(),
            district: filter.district.as_deref(),
            property_type: filter.property_type.map(|t| t.as_str()),
            status: filter.status.map(|s| s.as_str()),
        };
        let result =
            ListingRepo::search_location(&self.pool, &query, page.limit(), page.offset())
                .await
                .map_err(storage)?;
        paged(result, page)
    }

    async fn log_activity(&self, event: &ActivityEvent) -> Result<()> {
        ActivityRepo::insert(
            &self.pool,
            event.user_id.0,
            event.action.as_str(),
            event.listing_id.map(|id| id.0),
            &event.details,
        )
        .await
        .map_err(storage)
    }
}
