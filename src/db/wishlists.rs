//! Wishlist database repository
//!
//! A wishlist is one row per user plus a join table holding its book set.
//! Membership mutations are idempotent: adding a present book and removing
//! an absent one are both no-ops.

use anyhow::Result;
use sqlx::PgPool;

use super::books::BookWithPublisherRecord;

/// Wishlist record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WishlistRecord {
    pub id: i64,
    pub user_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub struct WishlistRepository {
    pool: PgPool,
}

impl WishlistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the wishlist for a user, if one exists
    pub async fn get_by_user(&self, user_id: i64) -> Result<Option<WishlistRecord>> {
        let record = sqlx::query_as::<_, WishlistRecord>(
            r#"
            SELECT id, user_id, created_at
            FROM wishlists
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get the wishlist for a user, creating it if absent.
    ///
    /// The insert races safely against concurrent creates thanks to the
    /// UNIQUE(user_id) constraint.
    pub async fn get_or_create(&self, user_id: i64) -> Result<WishlistRecord> {
        sqlx::query(
            r#"
            INSERT INTO wishlists (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        let record = sqlx::query_as::<_, WishlistRecord>(
            r#"
            SELECT id, user_id, created_at
            FROM wishlists
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Add a book to a wishlist; no-op if already present
    pub async fn add_book(&self, wishlist_id: i64, book_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO wishlist_books (wishlist_id, book_id)
            VALUES ($1, $2)
            ON CONFLICT (wishlist_id, book_id) DO NOTHING
            "#,
        )
        .bind(wishlist_id)
        .bind(book_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a book from a wishlist; no-op if absent
    pub async fn remove_book(&self, wishlist_id: i64, book_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM wishlist_books
            WHERE wishlist_id = $1 AND book_id = $2
            "#,
        )
        .bind(wishlist_id)
        .bind(book_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get the books on a wishlist with their publishers eagerly joined
    pub async fn books(&self, wishlist_id: i64) -> Result<Vec<BookWithPublisherRecord>> {
        let records = sqlx::query_as::<_, BookWithPublisherRecord>(
            r#"
            SELECT b.id, b.title, b.author, b.price, b.published_date,
                   p.id AS publisher_id, p.name AS publisher_name
            FROM wishlist_books wb
            JOIN books b ON b.id = wb.book_id
            JOIN publishers p ON p.id = b.publisher_id
            WHERE wb.wishlist_id = $1
            ORDER BY b.id
            "#,
        )
        .bind(wishlist_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
