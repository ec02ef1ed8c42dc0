//! Service layer

pub mod auth;

pub use auth::{AuthConfig, AuthService};
