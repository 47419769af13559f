//! Film Catalog API
//!
//! A REST API where registered users manage a shared catalog of films:
//! - Username/password registration with Argon2 password hashing
//! - Login issuing one-hour HS256 bearer tokens
//! - Film listing and details for any authenticated user
//! - Create, partial update and delete restricted to a film's creator

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    auth::{JwtConfig, JwtService},
    film::{FilmService, InMemoryFilmRepository, PostgresFilmRepository},
    storage::{connect, run_migrations, PostgresConfig},
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService},
};
use sqlx::PgPool;
use tracing::{info, warn};

/// Create the application state from configuration
///
/// Uses PostgreSQL when a database URL is configured, applying pending
/// migrations first; otherwise falls back to the in-memory stores.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let tokens = Arc::new(JwtService::new(JwtConfig::new(config.auth.jwt_secret.clone()))?);

    if !config.database.is_configured() {
        warn!("No database URL configured, using in-memory storage; data is lost on exit");
        return Ok(create_in_memory_state(tokens));
    }

    info!("Connecting to PostgreSQL...");
    let pool = connect(
        &PostgresConfig::new(config.database.url.clone())
            .with_max_connections(config.database.max_connections),
    )
    .await?;
    info!("PostgreSQL connection established");

    run_migrations(&pool).await?;

    Ok(create_postgres_state(pool, tokens))
}

/// Application state backed by the in-memory stores
pub fn create_in_memory_state(tokens: Arc<JwtService>) -> AppState {
    let users = Arc::new(InMemoryUserRepository::new());
    let films = Arc::new(InMemoryFilmRepository::new(users.clone()));

    AppState::new(
        Arc::new(UserService::new(users, Arc::new(Argon2Hasher::new()), tokens.clone())),
        Arc::new(FilmService::new(films)),
        tokens,
    )
}

/// Application state backed by PostgreSQL
pub fn create_postgres_state(pool: PgPool, tokens: Arc<JwtService>) -> AppState {
    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let films = Arc::new(PostgresFilmRepository::new(pool));

    AppState::new(
        Arc::new(UserService::new(users, Arc::new(Argon2Hasher::new()), tokens.clone())),
        Arc::new(FilmService::new(films)),
        tokens,
    )
}
