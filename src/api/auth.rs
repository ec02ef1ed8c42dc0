//! Token endpoints and bearer authentication
//!
//! `POST /token/pair` exchanges credentials for an access/refresh pair;
//! `POST /token/refresh` rotates a refresh token. Protected handlers take
//! the [`AuthUser`] extractor as an argument; routes without it are public.

use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    routing::post,
};
use serde::Deserialize;

use crate::AppState;
use crate::api::error::ApiError;
use crate::services::auth::AuthTokens;

#[derive(Debug, Deserialize)]
pub struct TokenPairRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRefreshRequest {
    pub refresh: String,
}

/// Extract a bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Authenticated user extracted from a bearer access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

        let claims = state
            .auth
            .validate_access_token(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        let user_id = claims
            .sub
            .parse()
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(AuthUser {
            user_id,
            username: claims.username,
        })
    }
}

/// Exchange username/password for a token pair
async fn obtain_pair(
    State(state): State<AppState>,
    Json(body): Json<TokenPairRequest>,
) -> Result<Json<AuthTokens>, ApiError> {
    let users = state.db.users();

    let user = users
        .get_by_username(&body.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    if !state.auth.verify_password(&body.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let issued = state.auth.generate_tokens(user.id, &user.username)?;
    users
        .create_refresh_token(user.id, &issued.refresh_token_hash, issued.refresh_expires_at)
        .await?;

    Ok(Json(issued.tokens))
}

/// Rotate a refresh token into a fresh pair
async fn refresh_pair(
    State(state): State<AppState>,
    Json(body): Json<TokenRefreshRequest>,
) -> Result<Json<AuthTokens>, ApiError> {
    let claims = state
        .auth
        .decode_refresh_token(&body.refresh)
        .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

    // The token must still be known server-side (not rotated away or revoked)
    let token_hash = state.auth.hash_token(&body.refresh);
    let users = state.db.users();
    let stored = users
        .get_refresh_token_by_hash(&token_hash)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))?;
    let user = users
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

    let issued = state.auth.generate_tokens(user.id, &user.username)?;
    users
        .create_refresh_token(user.id, &issued.refresh_token_hash, issued.refresh_expires_at)
        .await?;
    users.delete_refresh_token(stored.id).await?;

    Ok(Json(issued.tokens))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/token/pair", post(obtain_pair))
        .route("/token/refresh", post(refresh_pair))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_strips_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(bearer_token(&headers), None);

        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
