//! Command and query definitions
//!
//! Commands carry raw caller input. Validation turns them into typed values
//! before any storage access, so malformed input never reaches the database.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, AccountIdError, Amount, Balance};
use crate::ledger::{LedgerError, TransferOrder};

// =========================================================================
// TransferCommand
// =========================================================================

/// Command to move funds between two accounts of this shard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferCommand {
    #[serde(default)]
    pub source_account_id: Option<String>,
    #[serde(default)]
    pub destination_account_id: Option<String>,
    /// Amount to transfer (as string for precise decimal)
    #[serde(default)]
    pub amount: Option<String>,
}

impl TransferCommand {
    pub fn new(
        source_account_id: impl Into<String>,
        destination_account_id: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            source_account_id: Some(source_account_id.into()),
            destination_account_id: Some(destination_account_id.into()),
            amount: Some(amount.into()),
        }
    }

    /// Check presence and shape of every field
    pub fn validate(&self) -> Result<TransferOrder, LedgerError> {
        let source = required_account(self.source_account_id.as_deref(), "source_account_id")?;
        let destination = required_account(
            self.destination_account_id.as_deref(),
            "destination_account_id",
        )?;

        let raw_amount = self
            .amount
            .as_deref()
            .ok_or_else(|| LedgerError::InvalidRequest("amount is required".to_string()))?;
        let amount: Amount = raw_amount
            .parse()
            .map_err(|e| LedgerError::InvalidRequest(format!("Invalid amount: {}", e)))?;

        Ok(TransferOrder::new(source, destination, amount))
    }
}

/// Parse an account id field, naming the field in the error
pub fn required_account(raw: Option<&str>, field: &str) -> Result<AccountId, LedgerError> {
    let raw = raw.unwrap_or_default();
    AccountId::parse(raw).map_err(|e| match e {
        AccountIdError::Empty => LedgerError::InvalidRequest(format!("{field} is required")),
        AccountIdError::TooLong => LedgerError::InvalidRequest(format!("{field}: {e}")),
    })
}

// =========================================================================
// Query results
// =========================================================================

/// Result of a balance lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResult {
    pub account_id: AccountId,
    pub balance: Balance,
}

/// Result of a shard-wide partial sum
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialSumResult {
    pub worker_id: String,
    pub total: Decimal,
}
