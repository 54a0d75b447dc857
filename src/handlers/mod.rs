//! Command Handlers module
//!
//! Handlers validate caller input and orchestrate the ledger engine.

mod commands;
mod query_handler;
mod transfer_handler;


pub use commands::*;
pub use query_handler::QueryHandler;
pub use transfer_handler::TransferHandler;
