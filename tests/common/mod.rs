//! Common test utilities
//!
//! Each test gets its own Postgres schema, so tests can run in parallel
//! against one database. Database tests are `#[ignore]`d and run with
//! `cargo test -- --ignored` once DATABASE_URL points at Postgres.

#![allow(dead_code)]

use ledger_worker::db;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

/// Default lock wait for test connections
pub const LOCK_TIMEOUT_MS: u64 = 5_000;

/// Connect to DATABASE_URL inside a fresh schema with the ledger tables
pub async fn setup_test_db() -> PgPool {
    setup_test_db_with_lock_timeout(LOCK_TIMEOUT_MS).await
}

/// Same as `setup_test_db`, with a custom `lock_timeout` per connection
pub async fn setup_test_db_with_lock_timeout(lock_timeout_ms: u64) -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let schema = format!("test_{}", uuid::Uuid::new_v4().simple());

    let admin = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");
    admin
        .execute(format!("CREATE SCHEMA {schema}").as_str())
        .await
        .expect("Failed to create test schema");
    admin.close().await;

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .after_connect(move |conn, _meta| {
            let statement =
                format!("SET search_path TO {schema}; SET lock_timeout = {lock_timeout_ms}");
            Box::pin(async move {
                conn.execute(statement.as_str()).await?;
                Ok(())
            })
        })
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    db::apply_schema(&pool).await.expect("Failed to apply schema");

    pool
}

/// Insert an account with an initial balance
pub async fn seed_account(pool: &PgPool, id: &str, balance: Decimal) {
    sqlx::query("INSERT INTO account (id, balance) VALUES ($1, $2)")
        .bind(id)
        .bind(balance)
        .execute(pool)
        .await
        .expect("Failed to seed account");
}

/// Number of committed transfer records
pub async fn count_records(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM transfer_record")
        .fetch_one(pool)
        .await
        .expect("Failed to count records")
}

/// Current balance straight from the table
pub async fn balance_of(pool: &PgPool, id: &str) -> Decimal {
    sqlx::query_scalar("SELECT balance FROM account WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to read balance")
}
