//! Bookstore Backend - catalog service
//!
//! CRUD endpoints for publishers and books, a per-user wishlist, a user
//! listing, and JWT bearer authentication with an access/refresh pair.

mod api;
mod config;
mod db;
mod services;

use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::{CreateUser, Database};
use crate::services::{AuthConfig, AuthService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: AuthService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookstore=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting Bookstore Backend");

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    tracing::info!("Database connected");

    let auth = AuthService::new(AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        access_token_lifetime: config.access_token_lifetime,
        refresh_token_lifetime: config.refresh_token_lifetime,
    });

    bootstrap_user(&config, &db, &auth).await?;

    let state = AppState { db, auth };

    let app = Router::new()
        // Health endpoints (no auth required)
        .merge(api::health::router())
        // Token obtain/refresh pair
        .merge(api::auth::router())
        // Catalog and wishlist route groups
        .merge(api::publishers::router())
        .merge(api::books::router())
        .merge(api::wishlist::router())
        .merge(api::users::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed a first user on an empty database so the token endpoints are usable.
/// Identity is otherwise managed outside this service.
async fn bootstrap_user(config: &Config, db: &Database, auth: &AuthService) -> anyhow::Result<()> {
    let (Some(username), Some(password)) =
        (&config.bootstrap_username, &config.bootstrap_password)
    else {
        return Ok(());
    };

    let users = db.users();
    if users.count().await? > 0 {
        return Ok(());
    }

    let email = config
        .bootstrap_email
        .clone()
        .unwrap_or_else(|| format!("{username}@localhost"));
    let password_hash = auth.hash_password(password)?;

    let user = users
        .create(CreateUser {
            username: username.clone(),
            email,
            password_hash,
        })
        .await?;
    tracing::info!(username = %user.username, "Created bootstrap user");

    Ok(())
}
