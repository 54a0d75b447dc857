//! Transaction id generation
//!
//! Ids have the shape `TXN-{worker_id}-{unix_millis}-{seq}`. The wall-clock
//! part keeps ids roughly sortable across restarts; the per-process sequence
//! makes two ids from the same worker distinct even within one millisecond.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

pub const TRANSACTION_ID_PREFIX: &str = "TXN";

#[derive(Debug)]
pub struct TransactionIdGenerator {
    worker_id: String,
    seq: AtomicU64,
}

impl TransactionIdGenerator {
    pub fn new(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            seq: AtomicU64::new(1),
        }
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Allocate the next id
    pub fn next_id(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let millis = Utc::now().timestamp_millis();
        format!(
            "{}-{}-{}-{:06}",
            TRANSACTION_ID_PREFIX, self.worker_id, millis, seq
        )
    }
}
