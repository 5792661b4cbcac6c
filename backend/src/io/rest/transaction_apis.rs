//! # REST API for Transactions
//!
//! Endpoints for listing, creating and deleting income and expense records,
//! plus the monthly income shortcut. Writes answer `202 Accepted` with the
//! optimistic record; a write the store later rejects is reported on the
//! permission-error stream.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::io::rest::errors::ApiError;
use crate::io::rest::mappers::transaction_mapper::TransactionMapper;
use crate::io::rest::session::CurrentUser;
use crate::AppState;
use shared::{
    CreateTransactionRequest, DeleteTransactionResponse, SetIncomeRequest, TransactionListRequest,
    TransactionListResponse,
};

#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    pub limit: Option<u32>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/:id", delete(delete_transaction))
}

/// Mounted separately at `/api/income`
pub fn income_router() -> Router<AppState> {
    Router::new().route("/", post(set_income))
}

/// List transactions newest first, optionally limited
pub async fn list_transactions(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<TransactionListQuery>,
) -> impl IntoResponse {
    info!("GET /api/transactions - query: {:?}", query);

    let request = TransactionListRequest { limit: query.limit };
    let result = match request.limit {
        Some(limit) => state.transaction_service.recent(current.uid(), limit as usize).await,
        None => state.transaction_service.list(current.uid()).await,
    };

    match result {
        Ok(transactions) => {
            let response = TransactionListResponse {
                transactions: TransactionMapper::to_dto_list(transactions),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list transactions: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn create_transaction(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    info!("POST /api/transactions - request: {:?}", request);

    let command = TransactionMapper::to_create_command(request);
    match state.transaction_service.add(current.uid(), command) {
        Ok(pending) => {
            let transaction = TransactionMapper::to_dto(pending.detach());
            (StatusCode::ACCEPTED, Json(transaction)).into_response()
        }
        Err(e) => {
            error!("Failed to create transaction: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(transaction_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/transactions/{}", transaction_id);

    let transaction_id = state.transaction_service.delete(current.uid(), &transaction_id).detach();
    let response = DeleteTransactionResponse {
        transaction_id,
        success_message: "Transaction deleted".to_string(),
    };
    (StatusCode::ACCEPTED, Json(response))
}

/// Record the monthly salary as an income transaction
pub async fn set_income(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<SetIncomeRequest>,
) -> impl IntoResponse {
    info!("POST /api/income - request: {:?}", request);

    match state.transaction_service.set_income(current.uid(), request.amount) {
        Ok(pending) => {
            let transaction = TransactionMapper::to_dto(pending.detach());
            (StatusCode::ACCEPTED, Json(transaction)).into_response()
        }
        Err(e) => {
            error!("Failed to set income: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
