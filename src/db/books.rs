//! Book database repository

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

/// Book record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookRecord {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publisher_id: i64,
    pub price: Decimal,
    pub published_date: NaiveDate,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Book row with its publisher joined in, so listings avoid per-row lookups
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookWithPublisherRecord {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub price: Decimal,
    pub published_date: NaiveDate,
    pub publisher_id: i64,
    pub publisher_name: String,
}

/// Input for creating a book
#[derive(Debug)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub publisher_id: i64,
    pub price: Decimal,
    pub published_date: NaiveDate,
}

/// Input for a partial book update; None fields are left untouched
#[derive(Debug, Default)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher_id: Option<i64>,
    pub price: Option<Decimal>,
    pub published_date: Option<NaiveDate>,
}

pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all books with their publisher eagerly joined
    pub async fn list_with_publisher(&self) -> Result<Vec<BookWithPublisherRecord>> {
        let records = sqlx::query_as::<_, BookWithPublisherRecord>(
            r#"
            SELECT b.id, b.title, b.author, b.price, b.published_date,
                   p.id AS publisher_id, p.name AS publisher_name
            FROM books b
            JOIN publishers p ON p.id = b.publisher_id
            ORDER BY b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Get a book by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<BookRecord>> {
        let record = sqlx::query_as::<_, BookRecord>(
            r#"
            SELECT id, title, author, publisher_id, price, published_date,
                   created_at, updated_at
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get a book by ID with its publisher joined in
    pub async fn get_with_publisher(&self, id: i64) -> Result<Option<BookWithPublisherRecord>> {
        let record = sqlx::query_as::<_, BookWithPublisherRecord>(
            r#"
            SELECT b.id, b.title, b.author, b.price, b.published_date,
                   p.id AS publisher_id, p.name AS publisher_name
            FROM books b
            JOIN publishers p ON p.id = b.publisher_id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Create a new book
    pub async fn create(&self, input: CreateBook) -> Result<BookRecord> {
        let record = sqlx::query_as::<_, BookRecord>(
            r#"
            INSERT INTO books (title, author, publisher_id, price, published_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, author, publisher_id, price, published_date,
                      created_at, updated_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.author)
        .bind(input.publisher_id)
        .bind(input.price)
        .bind(input.published_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Update a book; only supplied fields change
    pub async fn update(&self, id: i64, input: UpdateBook) -> Result<Option<BookRecord>> {
        let record = sqlx::query_as::<_, BookRecord>(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                publisher_id = COALESCE($4, publisher_id),
                price = COALESCE($5, price),
                published_date = COALESCE($6, published_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, author, publisher_id, price, published_date,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.author)
        .bind(input.publisher_id)
        .bind(input.price)
        .bind(input.published_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Delete a book
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
