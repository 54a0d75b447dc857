//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::ledger::LedgerError;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Transfer not found: {0}")]
    TransferNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for caller errors detected outside the ledger engine
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        AppError::Ledger(LedgerError::InvalidRequest(msg.into()))
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut retryable = false;

        let (status, error_code, details) = match &self {
            AppError::Ledger(ledger_err) => match ledger_err {
                // 400 Bad Request
                LedgerError::InvalidRequest(msg) => {
                    (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
                }

                // 404 Not Found
                LedgerError::AccountNotFound(id) => {
                    (StatusCode::NOT_FOUND, "account_not_found", Some(id.clone()))
                }
                LedgerError::DestinationNotFound(id) => {
                    (StatusCode::NOT_FOUND, "destination_not_found", Some(id.clone()))
                }

                // 422 Unprocessable Entity
                LedgerError::InsufficientFundsOrUnknownSource(id) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "insufficient_funds_or_unknown_source",
                    Some(id.clone()),
                ),

                // 503 Service Unavailable
                LedgerError::StorageUnavailable(e) => {
                    tracing::error!("Storage error: {:?}", e);
                    retryable = ledger_err.is_retryable();
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "storage_unavailable",
                        ledger_err.sqlstate(),
                    )
                }
            },

            AppError::TransferNotFound(id) => {
                (StatusCode::NOT_FOUND, "transfer_not_found", Some(id.clone()))
            }

            // 500 Internal Server Error
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        // Storage internals stay in the logs
        let error = match &self {
            AppError::Ledger(LedgerError::StorageUnavailable(_)) => {
                "Storage unavailable".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
            retryable,
        };

        let mut response = (status, Json(body)).into_response();
        if retryable {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}
