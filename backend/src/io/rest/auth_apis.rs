//! # REST API for Authentication
//!
//! Sign-up, sign-in and session endpoints. Sign-up answers as soon as the
//! account exists; the starter data is written in the background.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tracing::{error, info};

use crate::domain::commands::auth::{SignInCommand, SignUpCommand};
use crate::domain::models::user::SessionUser;
use crate::domain::AuthSession;
use crate::io::rest::errors::ApiError;
use crate::io::rest::session::CurrentUser;
use crate::AppState;
use shared::{SessionResponse, SignInRequest, SignUpRequest, UserInfo};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
        .route("/me", get(me))
}

fn to_user_info(user: SessionUser) -> UserInfo {
    UserInfo {
        uid: user.uid,
        email: user.email,
        display_name: user.display_name,
    }
}

fn to_session_response(session: AuthSession) -> SessionResponse {
    SessionResponse {
        session_token: session.token,
        user: to_user_info(session.user),
    }
}

/// Create an account and open a session
pub async fn sign_up(State(state): State<AppState>, Json(request): Json<SignUpRequest>) -> impl IntoResponse {
    info!("POST /api/auth/sign-up - email: {}", request.email);

    let command = SignUpCommand {
        email: request.email,
        password: request.password,
        display_name: request.display_name,
        recaptcha_token: request.recaptcha_token,
    };

    match state.auth_service.sign_up(command).await {
        Ok((session, seed_write)) => {
            // Seed failures are reported on the permission-error channel
            seed_write.detach();
            (StatusCode::CREATED, Json(to_session_response(session))).into_response()
        }
        Err(e) => {
            error!("Failed to sign up: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn sign_in(State(state): State<AppState>, Json(request): Json<SignInRequest>) -> impl IntoResponse {
    info!("POST /api/auth/sign-in - email: {}", request.email);

    let command = SignInCommand {
        email: request.email,
        password: request.password,
        recaptcha_token: request.recaptcha_token,
    };

    match state.auth_service.sign_in(command).await {
        Ok(session) => (StatusCode::OK, Json(to_session_response(session))).into_response(),
        Err(e) => {
            error!("Failed to sign in: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn sign_out(State(state): State<AppState>, current: CurrentUser) -> impl IntoResponse {
    info!("POST /api/auth/sign-out - user: {}", current.uid());
    state.auth_service.sign_out(&current.token).await;
    StatusCode::NO_CONTENT
}

pub async fn me(current: CurrentUser) -> impl IntoResponse {
    info!("GET /api/auth/me - user: {}", current.uid());
    (StatusCode::OK, Json(to_user_info(current.user)))
}
