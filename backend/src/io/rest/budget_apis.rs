//! # REST API for Budgets
//!
//! Listing, full replacement from the manage-budget dialog, and the reset
//! that clears transactions and budgets together.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tracing::{error, info};

use crate::io::rest::errors::ApiError;
use crate::io::rest::mappers::budget_mapper::BudgetMapper;
use crate::io::rest::session::CurrentUser;
use crate::AppState;
use shared::{BudgetListResponse, ReplaceBudgetsRequest, ReplaceBudgetsResponse, ResetBudgetResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_budgets).put(replace_budgets))
        .route("/reset", post(reset_budget))
}

pub async fn list_budgets(State(state): State<AppState>, current: CurrentUser) -> impl IntoResponse {
    info!("GET /api/budgets - user: {}", current.uid());

    match state.budget_service.list(current.uid()).await {
        Ok(budgets) => {
            let response = BudgetListResponse {
                budgets: BudgetMapper::to_dto_list(budgets),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list budgets: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Replace the whole budget set with the submitted rows
pub async fn replace_budgets(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<ReplaceBudgetsRequest>,
) -> impl IntoResponse {
    info!("PUT /api/budgets - request: {:?}", request);

    let command = BudgetMapper::to_replace_command(request);
    match state.budget_service.replace(current.uid(), command).await {
        Ok(result) => {
            let response = ReplaceBudgetsResponse {
                budgets: BudgetMapper::to_dto_list(result.budgets),
                success_message: "Budget updated".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to replace budgets: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn reset_budget(State(state): State<AppState>, current: CurrentUser) -> impl IntoResponse {
    info!("POST /api/budgets/reset - user: {}", current.uid());

    match state.budget_service.reset(current.uid()).await {
        Ok(result) => {
            let response = ResetBudgetResponse {
                deleted_transactions: result.deleted_transactions,
                deleted_budgets: result.deleted_budgets,
                success_message: "Your budget and transactions have been cleared.".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to reset budget: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
