//! Query Handler
//!
//! Read-only operations: balance lookup and partial sum ("arqueo").

use crate::error::AppError;
use crate::ledger::LedgerStore;

use super::commands::required_account;
use super::{BalanceResult, PartialSumResult};

/// Handler for read-only shard queries
pub struct QueryHandler {
    store: LedgerStore,
}

impl QueryHandler {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    pub async fn balance(&self, account_id: &str) -> Result<BalanceResult, AppError> {
        let account_id = required_account(Some(account_id), "account_id")?;
        let balance = self.store.get_balance(&account_id).await?;

        tracing::debug!(account_id = %account_id, balance = %balance, "Balance read");

        Ok(BalanceResult {
            account_id,
            balance,
        })
    }

    pub async fn partial_sum(&self) -> Result<PartialSumResult, AppError> {
        let total = self.store.partial_sum().await?;

        tracing::info!(worker_id = %self.store.worker_id(), total = %total, "Partial sum computed");

        Ok(PartialSumResult {
            worker_id: self.store.worker_id().to_string(),
            total,
        })
    }
}
