//! Database connection management
//!
//! Provides utilities for opening the Postgres pool

use crate::errors::{from_sqlx, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Open a connection pool for `database_url`
pub async fn connect(database_url: &str) -> Result<PgPool> {
    connect_with(database_url, DEFAULT_MAX_CONNECTIONS).await
}

pub async fn connect_with(database_url: &str, max_connections: u32) -> Result<PgPool> {
    tracing::debug!(max_connections, "opening postgres pool");
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(from_sqlx)
}
