//! Book CRUD endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::api::SuccessResponse;
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;
use crate::api::publishers::PublisherResponse;
use crate::db::{BookWithPublisherRecord, CreateBook, UpdateBook};

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publisher: PublisherResponse,
    pub price: Decimal,
    pub published_date: NaiveDate,
}

impl From<BookWithPublisherRecord> for BookResponse {
    fn from(record: BookWithPublisherRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            author: record.author,
            publisher: PublisherResponse {
                id: record.publisher_id,
                name: record.publisher_name,
            },
            price: record.price,
            published_date: record.published_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub publisher_id: i64,
    pub price: Decimal,
    pub published_date: NaiveDate,
}

/// Partial update: fields left out of the body are untouched
#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher_id: Option<i64>,
    pub price: Option<Decimal>,
    pub published_date: Option<NaiveDate>,
}

/// Prices are stored as NUMERIC(6,2): at most 2 fractional digits, |price| < 10000.
/// Out-of-precision values are rejected rather than rounded.
fn validate_price(price: Decimal) -> Result<Decimal, ApiError> {
    if price.round_dp(2) != price {
        return Err(ApiError::Unprocessable(
            "price must have at most 2 decimal places".to_string(),
        ));
    }
    if price.abs() >= Decimal::from(10_000) {
        return Err(ApiError::Unprocessable(
            "price must fit 6 digits with 2 decimal places".to_string(),
        ));
    }

    Ok(price)
}

/// List all books with their publishers (public)
async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = state.db.books().list_with_publisher().await?;
    Ok(Json(books.into_iter().map(Into::into).collect()))
}

/// Create a book under an existing publisher
async fn create_book(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<CreateBookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let price = validate_price(body.price)?;

    let publisher = state
        .db
        .publishers()
        .get_by_id(body.publisher_id)
        .await?
        .ok_or(ApiError::NotFound("Publisher"))?;

    let book = state
        .db
        .books()
        .create(CreateBook {
            title: body.title,
            author: body.author,
            publisher_id: publisher.id,
            price,
            published_date: body.published_date,
        })
        .await?;

    Ok(Json(BookResponse {
        id: book.id,
        title: book.title,
        author: book.author,
        publisher: publisher.into(),
        price: book.price,
        published_date: book.published_date,
    }))
}

/// Apply a partial update to a book
async fn update_book(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(book_id): Path<i64>,
    Json(body): Json<UpdateBookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let books = state.db.books();

    books
        .get_by_id(book_id)
        .await?
        .ok_or(ApiError::NotFound("Book"))?;

    let price = body.price.map(validate_price).transpose()?;

    // A reassigned publisher must exist; the row would fail its FK anyway,
    // but this surfaces the same 404 the create path gives.
    if let Some(publisher_id) = body.publisher_id {
        state
            .db
            .publishers()
            .get_by_id(publisher_id)
            .await?
            .ok_or(ApiError::NotFound("Publisher"))?;
    }

    let updated = books
        .update(
            book_id,
            UpdateBook {
                title: body.title,
                author: body.author,
                publisher_id: body.publisher_id,
                price,
                published_date: body.published_date,
            },
        )
        .await?
        .ok_or(ApiError::NotFound("Book"))?;

    let book = books
        .get_with_publisher(updated.id)
        .await?
        .ok_or(ApiError::NotFound("Book"))?;

    Ok(Json(book.into()))
}

/// Delete a book
async fn delete_book(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(book_id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let deleted = state.db.books().delete(book_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Book"));
    }

    Ok(Json(SuccessResponse::ok()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/{id}", patch(update_book).delete(delete_book))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn price_with_two_decimals_is_accepted() {
        let price = Decimal::from_str("9.99").unwrap();
        assert_eq!(validate_price(price).unwrap(), price);

        let whole = Decimal::from_str("9999.99").unwrap();
        assert_eq!(validate_price(whole).unwrap(), whole);
    }

    #[test]
    fn price_with_excess_precision_is_rejected() {
        let price = Decimal::from_str("9.999").unwrap();
        assert!(validate_price(price).is_err());
    }

    #[test]
    fn price_exceeding_six_digits_is_rejected() {
        let price = Decimal::from_str("10000.00").unwrap();
        assert!(validate_price(price).is_err());
    }

    #[test]
    fn trailing_zeros_do_not_count_as_precision() {
        // 9.9900 is numerically 9.99 and fits NUMERIC(6,2)
        let price = Decimal::from_str("9.9900").unwrap();
        assert_eq!(validate_price(price).unwrap(), price);
    }

    #[test]
    fn partial_update_leaves_missing_fields_unset() {
        let body: UpdateBookRequest = serde_json::from_str(r#"{"title": "Renamed"}"#).unwrap();

        assert_eq!(body.title.as_deref(), Some("Renamed"));
        assert!(body.author.is_none());
        assert!(body.publisher_id.is_none());
        assert!(body.price.is_none());
        assert!(body.published_date.is_none());
    }

    #[test]
    fn empty_patch_body_deserializes() {
        let body: UpdateBookRequest = serde_json::from_str("{}").unwrap();

        assert!(body.title.is_none());
        assert!(body.author.is_none());
    }

    #[test]
    fn create_request_takes_price_as_json_number() {
        let body: CreateBookRequest = serde_json::from_str(
            r#"{
                "title": "X",
                "author": "Y",
                "publisher_id": 1,
                "price": 9.99,
                "published_date": "2024-01-01"
            }"#,
        )
        .unwrap();

        assert_eq!(body.price, Decimal::from_str("9.99").unwrap());
        assert_eq!(
            body.published_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }
}
