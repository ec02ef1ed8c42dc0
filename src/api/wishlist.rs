//! Wishlist endpoints
//!
//! The wishlist is created lazily: the first add for a user creates the row.
//! Add and remove are idempotent set mutations and both report success.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Serialize;

use crate::AppState;
use crate::api::SuccessResponse;
use crate::api::auth::AuthUser;
use crate::api::books::BookResponse;
use crate::api::error::ApiError;

#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub id: i64,
    pub user_id: i64,
    pub books: Vec<BookResponse>,
}

/// Get a user's wishlist with its books
async fn get_wishlist(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<WishlistResponse>, ApiError> {
    let wishlists = state.db.wishlists();

    let wishlist = wishlists
        .get_by_user(user_id)
        .await?
        .ok_or(ApiError::NotFound("Wishlist"))?;

    let books = wishlists.books(wishlist.id).await?;

    Ok(Json(WishlistResponse {
        id: wishlist.id,
        user_id: wishlist.user_id,
        books: books.into_iter().map(Into::into).collect(),
    }))
}

/// Add a book to a user's wishlist, creating the wishlist if needed
async fn add_to_wishlist(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((user_id, book_id)): Path<(i64, i64)>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let user = state
        .db
        .users()
        .get_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let book = state
        .db
        .books()
        .get_by_id(book_id)
        .await?
        .ok_or(ApiError::NotFound("Book"))?;

    let wishlists = state.db.wishlists();
    let wishlist = wishlists.get_or_create(user.id).await?;
    wishlists.add_book(wishlist.id, book.id).await?;

    Ok(Json(SuccessResponse::ok()))
}

/// Remove a book from a user's wishlist
async fn remove_from_wishlist(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((user_id, book_id)): Path<(i64, i64)>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let user = state
        .db
        .users()
        .get_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let book = state
        .db
        .books()
        .get_by_id(book_id)
        .await?
        .ok_or(ApiError::NotFound("Book"))?;

    let wishlists = state.db.wishlists();
    let wishlist = wishlists
        .get_by_user(user.id)
        .await?
        .ok_or(ApiError::NotFound("Wishlist"))?;

    wishlists.remove_book(wishlist.id, book.id).await?;

    Ok(Json(SuccessResponse::ok()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/wishlist/{user_id}", get(get_wishlist))
        .route("/wishlist/{user_id}/add/{book_id}", post(add_to_wishlist))
        .route(
            "/wishlist/{user_id}/remove/{book_id}",
            post(remove_from_wishlist),
        )
}
