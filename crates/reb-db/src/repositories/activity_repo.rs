//! Repository for the `activity_log` table.

use sqlx::PgPool;

pub struct ActivityRepo;

impl ActivityRepo {
    /// Append one entry. The internal user id is resolved when the user is known.
    pub async fn insert(
        pool: &PgPool,
        telegram_id: i64,
        action: &str,
        listing_id: Option<i64>,
        details: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO activity_log (user_id, telegram_id, action, listing_id, details)
             VALUES ((SELECT id FROM users WHERE telegram_id = $1), $1, $2, $3, $4)",
        )
        .bind(telegram_id)
        .bind(action)
        .bind(listing_id)
        .bind(sqlx::types::Json(details))
        .execute(pool)
        .await?;
        Ok(())
    }
}
