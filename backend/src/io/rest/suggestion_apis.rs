//! # REST API for AI Suggestions
//!
//! Both endpoints build the model input from the user's stored data, so the
//! request body carries nothing. A failed or malformed model answer comes
//! back as `502` with an inline notice for the panel.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use tracing::{error, info};

use crate::domain::suggestion_service::{build_budget_input, build_savings_input};
use crate::domain::DomainResult;
use crate::io::rest::errors::ApiError;
use crate::io::rest::mappers::suggestion_mapper::SuggestionMapper;
use crate::io::rest::session::CurrentUser;
use crate::AppState;
use shared::{BudgetSuggestionsResponse, SavingsSuggestionsResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/budget", post(budget_suggestions))
        .route("/savings", post(savings_suggestions))
}

async fn fetch_budget_suggestions(state: &AppState, uid: &str) -> DomainResult<BudgetSuggestionsResponse> {
    let (transactions, budgets) =
        tokio::try_join!(state.transaction_service.list(uid), state.budget_service.list(uid))?;
    let output = state
        .suggestion_service
        .budget_suggestions(build_budget_input(&transactions, &budgets))
        .await?;
    Ok(SuggestionMapper::to_budget_response(output))
}

async fn fetch_savings_suggestions(state: &AppState, uid: &str) -> DomainResult<SavingsSuggestionsResponse> {
    let goals = state.savings_service.list_goals(uid).await?;
    let output = state
        .suggestion_service
        .savings_suggestions(build_savings_input(&goals))
        .await?;
    Ok(SuggestionMapper::to_savings_response(output))
}

pub async fn budget_suggestions(State(state): State<AppState>, current: CurrentUser) -> impl IntoResponse {
    info!("POST /api/suggestions/budget - user: {}", current.uid());

    match fetch_budget_suggestions(&state, current.uid()).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to get budget suggestions: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn savings_suggestions(State(state): State<AppState>, current: CurrentUser) -> impl IntoResponse {
    info!("POST /api/suggestions/savings - user: {}", current.uid());

    match fetch_savings_suggestions(&state, current.uid()).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to get savings suggestions: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
