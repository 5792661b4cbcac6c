//! # REST API for Savings Goals
//!
//! Endpoints for the savings overview, goal creation and deletion,
//! contributions and per-goal history.
//!
//! Goal creation and contributions answer `202 Accepted` with optimistic
//! records. Deleting a goal waits for the cascade batch so the response can
//! report how many contributions went with it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use tracing::{error, info};

use crate::domain::commands::savings::AddContributionCommand;
use crate::io::rest::errors::ApiError;
use crate::io::rest::mappers::savings_mapper::SavingsMapper;
use crate::io::rest::session::CurrentUser;
use crate::AppState;
use shared::{AddContributionRequest, CreateSavingsGoalRequest, DeleteSavingsGoalResponse, SavingsHistoryResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_savings_overview))
        .route("/goals", post(create_goal))
        .route("/goals/:id", delete(delete_goal))
        .route("/goals/:id/contributions", post(add_contribution))
        .route("/goals/:id/history", get(get_goal_history))
        .route("/goals/:id/reconcile", post(reconcile_goal))
}

/// Every goal with its progress, plus totals
pub async fn get_savings_overview(State(state): State<AppState>, current: CurrentUser) -> impl IntoResponse {
    info!("GET /api/savings - user: {}", current.uid());

    match state.dashboard_service.savings_overview(current.uid()).await {
        Ok(summary) => (StatusCode::OK, Json(SavingsMapper::to_overview(summary))).into_response(),
        Err(e) => {
            error!("Failed to load savings overview: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn create_goal(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<CreateSavingsGoalRequest>,
) -> impl IntoResponse {
    info!("POST /api/savings/goals - request: {:?}", request);

    let command = SavingsMapper::to_create_command(request);
    match state.savings_service.add_goal(current.uid(), command) {
        Ok(pending) => {
            let goal = SavingsMapper::goal_to_dto(pending.detach());
            (StatusCode::ACCEPTED, Json(goal)).into_response()
        }
        Err(e) => {
            error!("Failed to create savings goal: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Delete a goal together with its contributions
pub async fn delete_goal(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(goal_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/savings/goals/{}", goal_id);

    match state.savings_service.delete_goal(current.uid(), &goal_id).await {
        Ok(result) => {
            let response = DeleteSavingsGoalResponse {
                success_message: format!(
                    "Savings goal deleted along with {} contribution(s)",
                    result.deleted_contributions
                ),
                goal_id: result.goal_id,
                deleted_contributions: result.deleted_contributions,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to delete savings goal {}: {}", goal_id, e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn add_contribution(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(goal_id): Path<String>,
    Json(request): Json<AddContributionRequest>,
) -> impl IntoResponse {
    info!("POST /api/savings/goals/{}/contributions - request: {:?}", goal_id, request);

    let command = AddContributionCommand {
        goal_id,
        amount: request.amount,
    };
    match state.savings_service.add_contribution(current.uid(), command).await {
        Ok(pending) => {
            let response = SavingsMapper::to_contribution_response(pending.detach());
            (StatusCode::ACCEPTED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to add contribution: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn get_goal_history(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(goal_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/savings/goals/{}/history", goal_id);

    match state.savings_service.history(current.uid(), &goal_id).await {
        Ok(entries) => {
            let response = SavingsHistoryResponse {
                goal_id,
                contributions: SavingsMapper::contribution_list_to_dto(entries),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to load history of goal {}: {}", goal_id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Rebuild `currentAmount` from the contribution ledger
pub async fn reconcile_goal(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(goal_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/savings/goals/{}/reconcile", goal_id);

    match state.savings_service.reconcile(current.uid(), &goal_id).await {
        Ok(goal) => (StatusCode::OK, Json(SavingsMapper::goal_to_dto(goal))).into_response(),
        Err(e) => {
            error!("Failed to reconcile goal {}: {}", goal_id, e);
            ApiError::from(e).into_response()
        }
    }
}
