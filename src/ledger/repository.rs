//! Ledger Store
//!
//! Core implementation of the shard operations: balance lookup, locked
//! transfers and partial sums. Every operation acquires its own pooled
//! connection and releases it on every exit path.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Instrument;

use crate::domain::{
    AccountId, Amount, Balance, OperationContext, TransactionIdGenerator, TransferRecord,
    TransferStatus,
};

use super::transfer::{self, TransferOrder};
use super::LedgerError;

/// Ledger engine for one worker's shard
#[derive(Debug, Clone)]
pub struct LedgerStore {
    pool: PgPool,
    ids: Arc<TransactionIdGenerator>,
}

impl LedgerStore {
    /// Create a new LedgerStore with a database pool and the worker identity
    pub fn new(pool: PgPool, worker_id: impl Into<String>) -> Self {
        Self {
            pool,
            ids: Arc::new(TransactionIdGenerator::new(worker_id)),
        }
    }

    pub fn worker_id(&self) -> &str {
        self.ids.worker_id()
    }

    // =========================================================================
    // GetBalance
    // =========================================================================

    /// Current committed balance of an account on this shard
    pub async fn get_balance(&self, account_id: &AccountId) -> Result<Balance, LedgerError> {
        let balance: Option<Decimal> = sqlx::query_scalar(
            r#"
            SELECT balance FROM account WHERE id = $1
            "#,
        )
        .bind(account_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        balance
            .map(Balance::new)
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.to_string()))
    }

    // =========================================================================
    // PartialSum
    // =========================================================================

    /// Sum of all balances on this shard, zero when the shard is empty
    pub async fn partial_sum(&self) -> Result<Decimal, LedgerError> {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(balance), 0) FROM account
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    // =========================================================================
    // Transfer
    // =========================================================================

    /// Move `order.amount` from source to destination atomically.
    ///
    /// Either the debit, the credit and the transfer record commit together,
    /// or the transaction is rolled back and nothing is visible.
    pub async fn transfer(
        &self,
        order: &TransferOrder,
        context: &OperationContext,
    ) -> Result<TransferRecord, LedgerError> {
        self.run_transfer(order)
            .instrument(context.span("transfer"))
            .await
    }

    async fn run_transfer(&self, order: &TransferOrder) -> Result<TransferRecord, LedgerError> {
        let mut tx = self.pool.begin().await?;

        let outcome = transfer::execute(&mut *tx, order, &self.ids).await;

        match outcome {
            Ok(record) => {
                if let Err(e) = tx.commit().await {
                    tracing::error!(
                        transaction_id = %record.transaction_id,
                        error = %e,
                        "Transfer commit failed"
                    );
                    return Err(e.into());
                }

                tracing::info!(
                    transaction_id = %record.transaction_id,
                    source = %record.source_account_id,
                    destination = %record.destination_account_id,
                    amount = %record.amount,
                    "Transfer committed"
                );
                Ok(record)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    // The server discards the transaction when the session ends
                    tracing::error!(
                        source = %order.source(),
                        error = %rollback_err,
                        "Transfer rollback failed"
                    );
                }

                if err.is_rejection() {
                    tracing::info!(
                        source = %order.source(),
                        destination = %order.destination(),
                        amount = %order.amount(),
                        reason = %err,
                        "Transfer rejected"
                    );
                } else {
                    tracing::warn!(
                        source = %order.source(),
                        destination = %order.destination(),
                        retryable = err.is_retryable(),
                        sqlstate = ?err.sqlstate(),
                        error = %err,
                        "Transfer rolled back"
                    );
                }
                Err(err)
            }
        }
    }

    // =========================================================================
    // Transfer records
    // =========================================================================

    /// Load a committed transfer by id
    pub async fn find_transfer(
        &self,
        transaction_id: &str,
    ) -> Result<Option<TransferRecord>, LedgerError> {
        let row: Option<(String, String, String, Decimal, DateTime<Utc>, String)> =
            sqlx::query_as(
                r#"
                SELECT transaction_id, source_account_id, destination_account_id,
                       amount, created_at, status
                FROM transfer_record
                WHERE transaction_id = $1
                "#,
            )
            .bind(transaction_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(decode_record).transpose()
    }

    /// Check database connectivity
    pub async fn ping(&self) -> Result<(), LedgerError> {
        crate::db::verify_connection(&self.pool).await?;
        Ok(())
    }
}

fn decode_record(
    (transaction_id, source, destination, amount, created_at, status): (
        String,
        String,
        String,
        Decimal,
        DateTime<Utc>,
        String,
    ),
) -> Result<TransferRecord, LedgerError> {
    let decode = |e: String| LedgerError::StorageUnavailable(sqlx::Error::Decode(e.into()));

    Ok(TransferRecord {
        source_account_id: AccountId::parse(&source).map_err(|e| decode(e.to_string()))?,
        destination_account_id: AccountId::parse(&destination)
            .map_err(|e| decode(e.to_string()))?,
        amount: Amount::new(amount).map_err(|e| decode(e.to_string()))?,
        status: TransferStatus::parse(&status)
            .ok_or_else(|| decode(format!("unknown transfer status {status:?}")))?,
        transaction_id,
        created_at,
    })
}
