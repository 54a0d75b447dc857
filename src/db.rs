//! Database module
//!
//! Pool construction and schema utilities.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

use crate::config::Config;

/// DDL for the `account` and `transfer_record` tables
pub const SCHEMA_SQL: &str = include_str!("../migrations/0001_init.sql");

/// Tables the worker reads and writes
const REQUIRED_TABLES: &[&str] = &["account", "transfer_record"];

/// Build the bounded connection pool.
///
/// Every new connection gets a `lock_timeout` and `statement_timeout`, so a
/// transfer waiting on a row lock fails instead of hanging.
pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    let lock_timeout_ms = config.lock_timeout_ms;
    let statement_timeout_ms = config.statement_timeout_ms;

    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(config.database_acquire_timeout_secs))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                let statement = format!(
                    "SET lock_timeout = {lock_timeout_ms}; SET statement_timeout = {statement_timeout_ms}"
                );
                conn.execute(statement.as_str()).await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
}

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Create the tables if they do not exist yet
pub async fn apply_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Unprepared execution so the multi-statement script runs as one batch
    pool.execute(SCHEMA_SQL).await?;
    tracing::info!("Schema applied");
    Ok(())
}

/// Check if required tables exist in the current search path
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = current_schema() AND table_name = $1
            )
            "#,
        )
        .bind(*table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}
