//! Ledger Errors
//!
//! Error taxonomy of the core operations. Variants are mutually exclusive and,
//! for a transfer, checked in declaration order.

/// SQLSTATEs that indicate a transient storage condition.
///
/// `40001` serialization_failure, `40P01` deadlock_detected,
/// `55P03` lock_not_available (lock_timeout), `57014` query_canceled
/// (statement_timeout), `53300` too_many_connections.
const RETRYABLE_SQLSTATES: &[&str] = &["40001", "40P01", "55P03", "57014", "53300"];

/// Errors that can occur in the ledger engine
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Malformed or missing input; storage was not touched
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Account is not held by this node
    #[error("Account not found on this node: {0}")]
    AccountNotFound(String),

    /// Source row missing or its balance does not cover the amount
    #[error("Insufficient funds or unknown source account: {0}")]
    InsufficientFundsOrUnknownSource(String),

    /// Destination is not held by this node
    #[error("Destination account not found on this node: {0}")]
    DestinationNotFound(String),

    /// Connection loss, lock/statement timeout, deadlock or constraint failure
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),
}

impl LedgerError {
    /// Business-rule rejections leave storage untouched and are final
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LedgerError::AccountNotFound(_)
                | LedgerError::InsufficientFundsOrUnknownSource(_)
                | LedgerError::DestinationNotFound(_)
        )
    }

    /// Check if the caller may retry the same request
    pub fn is_retryable(&self) -> bool {
        match self {
            LedgerError::StorageUnavailable(err) => is_transient(err),
            _ => false,
        }
    }

    /// SQLSTATE of the underlying database error, if any
    pub fn sqlstate(&self) -> Option<String> {
        match self {
            LedgerError::StorageUnavailable(err) => err
                .as_database_error()
                .and_then(|db| db.code())
                .map(|code| code.into_owned()),
            _ => None,
        }
    }
}

fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => true,
        sqlx::Error::Database(db) => db
            .code()
            .map(|code| RETRYABLE_SQLSTATES.iter().any(|state| *state == code))
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_not_retryable() {
        let err = LedgerError::InsufficientFundsOrUnknownSource("acc-1".to_string());
        assert!(err.is_rejection());
        assert!(!err.is_retryable());
        assert!(err.sqlstate().is_none());

        let err = LedgerError::DestinationNotFound("acc-2".to_string());
        assert!(err.is_rejection());
        assert!(err.to_string().contains("acc-2"));
    }

    #[test]
    fn test_invalid_request_is_not_a_rejection() {
        let err = LedgerError::InvalidRequest("amount is required".to_string());
        assert!(!err.is_rejection());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_pool_timeout_is_retryable() {
        let err = LedgerError::from(sqlx::Error::PoolTimedOut);
        assert!(err.is_retryable());
        assert!(!err.is_rejection());
    }

    #[test]
    fn test_row_not_found_is_not_retryable() {
        let err = LedgerError::from(sqlx::Error::RowNotFound);
        assert!(!err.is_retryable());
    }
}
