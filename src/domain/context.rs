//! Request context carried into the ledger engine.

use std::net::IpAddr;

use tracing::Span;
use uuid::Uuid;

/// Who asked for a ledger operation, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationContext {
    pub correlation_id: Uuid,
    pub client_ip: Option<IpAddr>,
}

impl OperationContext {
    /// Fresh context with a random correlation id
    pub fn new() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            client_ip: None,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Span wrapping one ledger operation; every event inside inherits the
    /// correlation id.
    pub fn span(&self, operation: &'static str) -> Span {
        tracing::info_span!(
            "ledger",
            operation,
            correlation_id = %self.correlation_id,
            client_ip = ?self.client_ip,
        )
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}
