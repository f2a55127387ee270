//! Persistence layer: PostgreSQL schema access.
//!
//! [`PostgresPersistence`] owns a `sqlx::PgPool` and exposes one async
//! method per query. Every call checks a connection out of the pool for
//! its own duration; multi-statement writes run inside a transaction
//! that rolls back when dropped uncommitted.

pub mod events;
pub mod junction;
pub mod models;
pub mod postgres;
pub mod users;

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::ExplorerConfig;

pub use junction::{Direction, Junction};
pub use postgres::{PostgresPersistence, ReplyTable};

/// Embedded migrations from `./migrations`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Builds the connection pool described by `config`.
///
/// # Errors
///
/// Returns the driver error if the initial connection cannot be made.
pub async fn connect(config: &ExplorerConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await
}
