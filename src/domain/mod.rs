//! Domain module
//!
//! Core domain types shared by the ledger engine and the HTTP layer.

pub mod account;
pub mod amount;
pub mod context;
pub mod transaction_id;
pub mod transfer;

pub use account::{AccountId, AccountIdError};
pub use amount::{Amount, AmountError, Balance, CURRENCY_SCALE};
pub use context::OperationContext;
pub use transaction_id::TransactionIdGenerator;
pub use transfer::{TransferRecord, TransferStatus};
