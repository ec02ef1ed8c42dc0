//! Publisher CRUD endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::api::SuccessResponse;
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;
use crate::db::{CreatePublisher, PublisherRecord, UpdatePublisher};

#[derive(Debug, Serialize)]
pub struct PublisherResponse {
    pub id: i64,
    pub name: String,
}

impl From<PublisherRecord> for PublisherResponse {
    fn from(record: PublisherRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PublisherRequest {
    pub name: String,
}

/// List all publishers (public)
async fn list_publishers(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublisherResponse>>, ApiError> {
    let publishers = state.db.publishers().list().await?;
    Ok(Json(publishers.into_iter().map(Into::into).collect()))
}

/// Create a publisher
async fn create_publisher(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<PublisherRequest>,
) -> Result<Json<PublisherResponse>, ApiError> {
    let publisher = state
        .db
        .publishers()
        .create(CreatePublisher { name: body.name })
        .await?;

    Ok(Json(publisher.into()))
}

/// Replace a publisher's fields
async fn update_publisher(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(publisher_id): Path<i64>,
    Json(body): Json<PublisherRequest>,
) -> Result<Json<PublisherResponse>, ApiError> {
    let publisher = state
        .db
        .publishers()
        .update(publisher_id, UpdatePublisher { name: body.name })
        .await?
        .ok_or(ApiError::NotFound("Publisher"))?;

    Ok(Json(publisher.into()))
}

/// Delete a publisher and, by cascade, its books
async fn delete_publisher(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(publisher_id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let deleted = state.db.publishers().delete(publisher_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Publisher"));
    }

    Ok(Json(SuccessResponse::ok()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/publishers", get(list_publishers).post(create_publisher))
        .route(
            "/publishers/{id}",
            put(update_publisher).delete(delete_publisher),
        )
}
