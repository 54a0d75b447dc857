//! Transfer Handler
//!
//! Validates a transfer command and runs it as a detached unit of work.

use crate::domain::{OperationContext, TransferRecord};
use crate::error::AppError;
use crate::ledger::LedgerStore;

use super::TransferCommand;

/// Handler for shard-local transfers
pub struct TransferHandler {
    store: LedgerStore,
}

impl TransferHandler {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Execute the transfer command.
    ///
    /// The storage work is spawned onto its own task. If the caller goes away
    /// (client disconnect drops this future), the task still runs to commit or
    /// rollback; it is never abandoned between the debit and the credit.
    pub async fn execute(
        &self,
        command: TransferCommand,
        context: &OperationContext,
    ) -> Result<TransferRecord, AppError> {
        let order = command.validate()?;

        let store = self.store.clone();
        let context = *context;
        let unit_of_work = tokio::spawn(async move { store.transfer(&order, &context).await });

        let record = unit_of_work
            .await
            .map_err(|e| AppError::Internal(format!("transfer task failed: {}", e)))??;

        Ok(record)
    }
}
