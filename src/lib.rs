//! ledger_worker Library
//!
//! Re-exports modules for integration testing and the binaries.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod ledger;

mod error;

pub use config::{Config, LogFormat};
pub use domain::{AccountId, Amount, AmountError, Balance, OperationContext, TransferRecord};
pub use error::{AppError, ErrorResponse};
pub use ledger::{LedgerError, LedgerStore, TransferOrder};
