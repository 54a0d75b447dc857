//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{OperationContext, TransferRecord};
use crate::error::AppError;
use crate::handlers::{QueryHandler, TransferCommand, TransferHandler};
use crate::ledger::LedgerStore;

/// Shared state of the HTTP layer
#[derive(Debug, Clone)]
pub struct AppState {
    pub ledger: LedgerStore,
}

impl AppState {
    pub fn new(ledger: LedgerStore) -> Self {
        Self { ledger }
    }
}

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferResponse {
    pub transaction_id: String,
    pub source_account_id: String,
    pub destination_account_id: String,
    pub amount: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<TransferRecord> for TransferResponse {
    fn from(record: TransferRecord) -> Self {
        Self {
            transaction_id: record.transaction_id,
            source_account_id: record.source_account_id.into(),
            destination_account_id: record.destination_account_id.into(),
            amount: record.amount.into(),
            status: record.status.as_str().to_string(),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    #[serde(default)]
    pub account_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub account_id: String,
    /// Decimal string, never a float
    pub balance: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PartialSumResponse {
    pub worker_id: String,
    pub total: String,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/accounts/:account_id/balance", get(get_account_balance))
        .route("/balance", get(get_balance_by_query))
        .route("/transfers", post(transfer))
        .route("/transfers/:transaction_id", get(get_transfer))
        .route("/partial-sum", get(partial_sum))
}

// =========================================================================
// GET /accounts/:account_id/balance
// =========================================================================

/// Get account balance
async fn get_account_balance(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let result = QueryHandler::new(state.ledger).balance(&account_id).await?;

    Ok(Json(BalanceResponse {
        account_id: result.account_id.into(),
        balance: result.balance.to_string(),
    }))
}

/// Get account balance by query parameter
async fn get_balance_by_query(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, AppError> {
    let account_id = query.account_id.unwrap_or_default();
    get_account_balance(State(state), Path(account_id)).await
}

// =========================================================================
// POST /transfers
// =========================================================================

/// Transfer funds between two accounts of this shard
async fn transfer(
    State(state): State<AppState>,
    context: Option<Extension<OperationContext>>,
    payload: Result<Json<TransferCommand>, JsonRejection>,
) -> Result<(StatusCode, Json<TransferResponse>), AppError> {
    let Json(command) =
        payload.map_err(|rejection| AppError::invalid_request(rejection.body_text()))?;

    let context = context
        .map(|Extension(ctx)| ctx)
        .unwrap_or_default();

    let record = TransferHandler::new(state.ledger)
        .execute(command, &context)
        .await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

// =========================================================================
// GET /transfers/:transaction_id
// =========================================================================

/// Get a committed transfer
async fn get_transfer(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransferResponse>, AppError> {
    let record = state
        .ledger
        .find_transfer(&transaction_id)
        .await?
        .ok_or(AppError::TransferNotFound(transaction_id))?;

    Ok(Json(record.into()))
}

// =========================================================================
// GET /partial-sum
// =========================================================================

/// Sum of all balances held by this worker
async fn partial_sum(
    State(state): State<AppState>,
) -> Result<Json<PartialSumResponse>, AppError> {
    let result = QueryHandler::new(state.ledger).partial_sum().await?;

    Ok(Json(PartialSumResponse {
        worker_id: result.worker_id,
        total: result.total.to_string(),
    }))
}
