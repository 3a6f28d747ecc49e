//! Repository for the `users` table.

use sqlx::{PgConnection, PgPool};

/// Users are addressed by their Telegram id; `id` is internal to the database.
pub struct UserRepo;

impl UserRepo {
    /// Insert the user or refresh their names. The language is only set on insert.
    pub async fn upsert(
        pool: &PgPool,
        telegram_id: i64,
        username: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
        language: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO users (telegram_id, username, first_name, last_name, language)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (telegram_id) DO UPDATE SET
                username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                updated_at = NOW()",
        )
        .bind(telegram_id)
        .bind(username)
        .bind(first_name)
        .bind(last_name)
        .bind(language)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Make sure a row exists (users who never sent `/start`) and return its internal id.
    pub async fn ensure(conn: &mut PgConnection, telegram_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (telegram_id) VALUES ($1)
             ON CONFLICT (telegram_id) DO UPDATE SET telegram_id = EXCLUDED.telegram_id
             RETURNING id",
        )
        .bind(telegram_id)
        .fetch_one(conn)
        .await
    }

    pub async fn find_language(
        pool: &PgPool,
        telegram_id: i64,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT language FROM users WHERE telegram_id = $1")
            .bind(telegram_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_language(
        pool: &PgPool,
        telegram_id: i64,
        language: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO users (telegram_id, language) VALUES ($1, $2)
             ON CONFLICT (telegram_id) DO UPDATE SET language = EXCLUDED.language, updated_at = NOW()",
        )
        .bind(telegram_id)
        .bind(language)
        .execute(pool)
        .await?;
        Ok(())
    }
}
