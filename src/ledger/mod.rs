//! Ledger module
//!
//! Persistence and locking for the shard's accounts and transfer records.

mod error;
mod repository;
mod transfer;

pub use error::LedgerError;
pub use repository::LedgerStore;
pub use transfer::TransferOrder;
