//! API route definitions
//!
//! One router per route group, assembled in `main`. Every group except
//! health, the token endpoints, and the public catalog listings requires a
//! bearer access token.

pub mod auth;
pub mod books;
pub mod error;
pub mod health;
pub mod publishers;
pub mod users;
pub mod wishlist;

use serde::Serialize;

/// Response body for mutation-only operations (delete, wishlist add/remove)
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
