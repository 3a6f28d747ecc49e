//! Repository for the `listings` table.

use sqlx::{types::Json, PgPool};

use crate::{models::ListingRow, repositories::UserRepo};

/// Listing columns joined with the author. Expects `listings l JOIN users u`.
pub(crate) const LISTING_COLUMNS: &str = "l.id, u.telegram_id AS author_telegram_id, \
    u.username AS author_username, u.first_name AS author_first_name, \
    l.title, l.description, l.property_type, l.status, l.is_makler, l.region, l.district, \
    l.full_address, l.price, l.area, l.contact_info, l.photo_file_ids, l.approval_status, \
    l.is_approved, l.is_active, l.favorites_count, l.created_at, l.updated_at, l.published_at";

pub(crate) const LISTING_FROM: &str = "FROM listings l JOIN users u ON u.id = l.user_id";

/// Only approved, active listings are shown to the public.
pub(crate) const PUBLIC: &str = "l.is_approved AND l.is_active";

/// Input for [`ListingRepo::create`].
#[derive(Debug, Clone)]
pub struct CreateListing<'a> {
    pub author_telegram_id: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub property_type: &'a str,
    pub status: &'a str,
    pub is_makler: bool,
    pub region: &'a str,
    pub district: &'a str,
    pub full_address: &'a str,
    pub price: i64,
    pub area: f64,
    pub contact_info: &'a str,
    pub photo_file_ids: &'a [String],
}

/// Optional location-search filters, all matched exactly.
#[derive(Debug, Clone, Default)]
pub struct LocationQuery<'a> {
    pub region: Option<&'a str>,
    pub district: Option<&'a str>,
    pub property_type: Option<&'a str>,
    pub status: Option<&'a str>,
}

/// Build the WHERE clause for a public location search.
///
/// Returns `(where_clause, bind_values, next_bind_index)`; binds are `$1..` in order.
pub(crate) fn build_location_filter(q: &LocationQuery<'_>) -> (String, Vec<String>, u32) {
    let mut conditions = vec![PUBLIC.to_string()];
    let mut bind_values = Vec::new();
    let mut bind_idx = 1u32;

    for (column, value) in [
        ("l.region", q.region),
        ("l.district", q.district),
        ("l.property_type", q.property_type),
        ("l.status", q.status),
    ] {
        if let Some(value) = value {
            conditions.push(format!("{column} = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(value.to_string());
        }
    }

    (
        format!("WHERE {}", conditions.join(" AND ")),
        bind_values,
        bind_idx,
    )
}

/// `%query%` for ILIKE, with the pattern metacharacters of the query escaped.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub struct ListingRepo;

impl ListingRepo {
    /// Insert a pending listing, creating the author row if needed. Returns the new id.
    pub async fn create(pool: &PgPool, input: &CreateListing<'_>) -> Result<i64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let user_id = UserRepo::ensure(&mut tx, input.author_telegram_id).await?;
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO listings
                (user_id, title, description, property_type, status, is_makler, region, district,
                 full_address, price, area, contact_info, photo_file_ids, admin_notes,
                 approval_status, is_approved, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                     'pending', FALSE, TRUE)
             RETURNING id",
        )
        .bind(user_id)
        .bind(input.title)
        .bind(input.description)
        .bind(input.property_type)
        .bind(input.status)
        .bind(input.is_makler)
        .bind(input.region)
        .bind(input.district)
        .bind(input.full_address)
        .bind(input.price)
        .bind(input.area)
        .bind(input.contact_info)
        .bind(Json(input.photo_file_ids))
        .bind(if input.is_makler { "makler" } else { "maklersiz" })
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(id)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<ListingRow>, sqlx::Error> {
        let query = format!("SELECT {LISTING_COLUMNS} {LISTING_FROM} WHERE l.id = $1");
        sqlx::query_as::<_, ListingRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Pending listings, oldest first.
    pub async fn list_pending(pool: &PgPool, limit: i64) -> Result<Vec<ListingRow>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} {LISTING_FROM}
             WHERE l.approval_status = 'pending'
             ORDER BY l.created_at ASC, l.id ASC
             LIMIT $1"
        );
        sqlx::query_as::<_, ListingRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn count_pending(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM listings WHERE approval_status = 'pending'",
        )
        .fetch_one(pool)
        .await
    }

    /// Move a pending listing to `approval_status`; `is_approved` and `published_at`
    /// change in the same statement. Returns whether a pending row was updated.
    pub async fn set_approval(
        pool: &PgPool,
        id: i64,
        approval_status: &str,
        is_approved: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listings SET
                approval_status = $2,
                is_approved = $3,
                published_at = CASE WHEN $3 THEN NOW() ELSE published_at END,
                updated_at = NOW()
             WHERE id = $1 AND approval_status = 'pending'",
        )
        .bind(id)
        .bind(approval_status)
        .bind(is_approved)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn set_active(pool: &PgPool, id: i64, active: bool) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE listings SET is_active = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete a listing and its favorites in one transaction.
    /// Returns the Telegram ids of the users who had it in their favorites.
    pub async fn delete_with_favorites(pool: &PgPool, id: i64) -> Result<Vec<i64>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let users = sqlx::query_scalar::<_, i64>(
            "SELECT u.telegram_id FROM favorites f
             JOIN users u ON u.id = f.user_id
             WHERE f.listing_id = $1
             ORDER BY u.telegram_id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM favorites WHERE listing_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(users)
    }

    /// One page of an author's listings (any status), newest first, plus the total.
    pub async fn list_for_author(
        pool: &PgPool,
        telegram_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ListingRow>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} {LISTING_FROM}
             WHERE u.telegram_id = $1
             ORDER BY l.created_at DESC, l.id DESC
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, ListingRow>(&query)
            .bind(telegram_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM listings l JOIN users u ON u.id = l.user_id
             WHERE u.telegram_id = $1",
        )
        .bind(telegram_id)
        .fetch_one(pool)
        .await?;
        Ok((rows, total))
    }

    /// Case-insensitive search over title, description and address of public listings.
    pub async fn search_keyword(
        pool: &PgPool,
        query_text: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ListingRow>, i64), sqlx::Error> {
        let pattern = like_pattern(query_text);
        let matches = "(l.title ILIKE $1 OR l.description ILIKE $1 OR l.full_address ILIKE $1)";
        let query = format!(
            "SELECT {LISTING_COLUMNS} {LISTING_FROM}
             WHERE {PUBLIC} AND {matches}
             ORDER BY l.created_at DESC, l.id DESC
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, ListingRow>(&query)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        let count = format!("SELECT COUNT(*)::BIGINT FROM listings l WHERE {PUBLIC} AND {matches}");
        let total = sqlx::query_scalar::<_, i64>(&count)
            .bind(&pattern)
            .fetch_one(pool)
            .await?;
        Ok((rows, total))
    }

    pub async fn search_location(
        pool: &PgPool,
        filter: &LocationQuery<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ListingRow>, i64), sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_location_filter(filter);
        let query = format!(
            "SELECT {LISTING_COLUMNS} {LISTING_FROM} {where_clause}
             ORDER BY l.created_at DESC, l.id DESC
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );
        let mut q = sqlx::query_as::<_, ListingRow>(&query);
        for value in &bind_values {
            q = q.bind(value.as_str());
        }
        let rows = q.bind(limit).bind(offset).fetch_all(pool).await?;

        let count = format!("SELECT COUNT(*)::BIGINT FROM listings l {where_clause}");
        let mut c = sqlx::query_scalar::<_, i64>(&count);
        for value in &bind_values {
            c = c.bind(value.as_str());
        }
        let total = c.fetch_one(pool).await?;
        Ok((rows, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_filter_numbers_binds_in_order() {
        let (clause, binds, next) = build_location_filter(&LocationQuery {
            region: Some("tashkent_city"),
            district: None,
            property_type: Some("apartment"),
            status: Some("rent"),
        });
        assert_eq!(
            clause,
            "WHERE l.is_approved AND l.is_active AND l.region = $1 \
             AND l.property_type = $2 AND l.status = $3"
        );
        assert_eq!(binds, vec!["tashkent_city", "apartment", "rent"]);
        assert_eq!(next, 4);
    }

    #[test]
    fn empty_filter_still_restricts_to_public() {
        let (clause, binds, next) = build_location_filter(&LocationQuery::default());
        assert_eq!(clause, "WHERE l.is_approved AND l.is_active");
        assert!(binds.is_empty());
        assert_eq!(next, 1);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" Chilonzor "), "%Chilonzor%");
        assert_eq!(like_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }
}
