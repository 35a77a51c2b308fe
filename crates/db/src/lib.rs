//! PostgreSQL persistence for laboratories.
//!
//! - [`models`]: row structs and their conversion into core entities.
//! - [`repositories`]: zero-sized repos with async query methods.
//! - [`seed_defaults`]: starter laboratories for an empty database.
//! - [`PgLaboratoryStore`]: adapts [`LaboratoryRepo`] to the core
//!   [`LaboratoryStore`](marie_core::store::LaboratoryStore) trait.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod repositories;
pub mod seed;
pub mod store;

pub use repositories::LaboratoryRepo;
pub use seed::seed_defaults;
pub use store::PgLaboratoryStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
