//! Publisher database repository

use anyhow::Result;
use sqlx::PgPool;

/// Publisher record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PublisherRecord {
    pub id: i64,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Input for creating a publisher
#[derive(Debug)]
pub struct CreatePublisher {
    pub name: String,
}

/// Input for a full-replace publisher update
#[derive(Debug)]
pub struct UpdatePublisher {
    pub name: String,
}

pub struct PublisherRepository {
    pool: PgPool,
}

impl PublisherRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all publishers
    pub async fn list(&self) -> Result<Vec<PublisherRecord>> {
        let records = sqlx::query_as::<_, PublisherRecord>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM publishers
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Get a publisher by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<PublisherRecord>> {
        let record = sqlx::query_as::<_, PublisherRecord>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM publishers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Create a new publisher
    pub async fn create(&self, input: CreatePublisher) -> Result<PublisherRecord> {
        let record = sqlx::query_as::<_, PublisherRecord>(
            r#"
            INSERT INTO publishers (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Replace all writable fields of a publisher
    pub async fn update(&self, id: i64, input: UpdatePublisher) -> Result<Option<PublisherRecord>> {
        let record = sqlx::query_as::<_, PublisherRecord>(
            r#"
            UPDATE publishers SET
                name = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Delete a publisher (cascades to its books)
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
