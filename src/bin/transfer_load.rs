//! Transfer Load Tool
//!
//! Seeds a ring of accounts, fires concurrent transfers around the ring and
//! checks that the shard's partial sum is unchanged afterwards.
//!
//! Run with: cargo run --bin transfer_load --release -- --accounts 20 --transfers 2000 --concurrency 16

use std::sync::Arc;
use std::time::Instant;

use ledger_worker::domain::OperationContext;
use ledger_worker::handlers::TransferCommand;
use ledger_worker::{db, Config, LedgerStore};
use rust_decimal::Decimal;

fn arg_or(args: &[String], flag: &str, default: usize) -> usize {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let accounts = arg_or(&args, "--accounts", 20).max(2);
    let transfers = arg_or(&args, "--transfers", 2000);
    let concurrency = arg_or(&args, "--concurrency", 16).max(1);

    let config = Config::from_env()?;
    let pool = db::create_pool(&config).await?;
    db::apply_schema(&pool).await?;

    let store = LedgerStore::new(pool.clone(), config.worker_id.clone());
    let prefix = format!("load-{}", uuid::Uuid::new_v4().simple());

    println!("Seeding {} accounts with prefix {}", accounts, prefix);
    for i in 0..accounts {
        sqlx::query("INSERT INTO account (id, balance) VALUES ($1, $2)")
            .bind(format!("{prefix}-{i}"))
            .bind(Decimal::new(100_000, 2))
            .execute(&pool)
            .await?;
    }

    let before = store.partial_sum().await?;
    println!("Partial sum before: {}", before);

    let store = Arc::new(store);
    let semaphore = Arc::new(tokio::sync::Semaphore::new(concurrency));
    let start = Instant::now();
    let mut tasks = Vec::with_capacity(transfers);

    for i in 0..transfers {
        let store = Arc::clone(&store);
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let command = TransferCommand::new(
            format!("{prefix}-{}", i % accounts),
            format!("{prefix}-{}", (i * 7 + 1) % accounts),
            format!("{}.{:02}", i % 50 + 1, i % 100),
        );

        tasks.push(tokio::spawn(async move {
            let _permit = permit;
            let order = command.validate()?;
            store.transfer(&order, &OperationContext::new()).await
        }));
    }

    let (mut committed, mut rejected, mut storage_errors) = (0u64, 0u64, 0u64);
    for task in tasks {
        match task.await? {
            Ok(_) => committed += 1,
            Err(e) if e.is_rejection() => rejected += 1,
            Err(_) => storage_errors += 1,
        }
    }

    let elapsed = start.elapsed();
    let after = store.partial_sum().await?;

    println!("\n=== Transfer Load Results ===");
    println!("Transfers: {}", transfers);
    println!("Committed: {}", committed);
    println!("Rejected: {}", rejected);
    println!("Storage errors: {}", storage_errors);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Rate: {:.0} transfers/sec", committed as f64 / elapsed.as_secs_f64());
    println!("Partial sum after: {}", after);

    pool.close().await;

    if before != after {
        anyhow::bail!("partial sum changed: {} -> {}", before, after);
    }
    println!("Partial sum conserved");

    Ok(())
}
