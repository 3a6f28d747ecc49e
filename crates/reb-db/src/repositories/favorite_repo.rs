//! Repository for the `favorites` table.

use sqlx::PgPool;

use crate::{
    models::ListingRow,
    repositories::{
        listing_repo::{LISTING_COLUMNS, LISTING_FROM, PUBLIC},
        UserRepo,
    },
};

pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Save a listing for a user. Idempotent: returns `false` when it was already saved.
    /// `favorites_count` is recomputed in the same transaction.
    pub async fn add(pool: &PgPool, telegram_id: i64, listing_id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let user_id = UserRepo::ensure(&mut tx, telegram_id).await?;
        let inserted = sqlx::query(
            "INSERT INTO favorites (user_id, listing_id) VALUES ($1, $2)
             ON CONFLICT (user_id, listing_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(listing_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            == 1;

        if inserted {
            sqlx::query(
                "UPDATE listings SET favorites_count =
                    (SELECT COUNT(*) FROM favorites WHERE listing_id = $1)
                 WHERE id = $1",
            )
            .bind(listing_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(inserted)
    }

    /// One page of a user's public favorites, most recently saved first, plus the total.
    pub async fn list_for_user(
        pool: &PgPool,
        telegram_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ListingRow>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} {LISTING_FROM}
             JOIN favorites f ON f.listing_id = l.id
             JOIN users fu ON fu.id = f.user_id
             WHERE fu.telegram_id = $1 AND {PUBLIC}
             ORDER BY f.created_at DESC, f.id DESC
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, ListingRow>(&query)
            .bind(telegram_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count = format!(
            "SELECT COUNT(*)::BIGINT FROM favorites f
             JOIN users fu ON fu.id = f.user_id
             JOIN listings l ON l.id = f.listing_id
             WHERE fu.telegram_id = $1 AND {PUBLIC}"
        );
        let total = sqlx::query_scalar::<_, i64>(&count)
            .bind(telegram_id)
            .fetch_one(pool)
            .await?;
        Ok((rows, total))
    }
}
