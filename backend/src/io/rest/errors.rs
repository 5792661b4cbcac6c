//! Translation of domain errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::error;

use crate::clients::AuthErrorCode;
use crate::domain::auth_service::{auth_error_message, VERIFICATION_FAILED_MESSAGE};
use crate::domain::{DomainError, SuggestionError};
use crate::storage::StoreError;

pub const SUGGESTIONS_NOTICE: &str = "Could not load suggestions. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                title: title.into(),
                description: description.into(),
                notice: None,
            },
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.body.notice = Some(notice.into());
        self
    }

    pub fn unauthenticated() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", "Please sign in to continue.")
    }

    fn from_suggestion(err: &SuggestionError) -> Self {
        let status = match err {
            SuggestionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, "Error", format!("Failed to get AI suggestions: {}", err)).with_notice(SUGGESTIONS_NOTICE)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        if err.is_validation() {
            return Self::new(StatusCode::BAD_REQUEST, "Invalid Input", err.to_string());
        }
        match &err {
            DomainError::NotFound(what) => Self::new(StatusCode::NOT_FOUND, "Not Found", format!("{} not found", what)),
            DomainError::Auth(auth) => {
                let status = match auth.code {
                    AuthErrorCode::UserNotFound | AuthErrorCode::WrongPassword => StatusCode::UNAUTHORIZED,
                    AuthErrorCode::InvalidEmail | AuthErrorCode::WeakPassword | AuthErrorCode::EmailAlreadyInUse => {
                        StatusCode::BAD_REQUEST
                    }
                    AuthErrorCode::Other => StatusCode::BAD_GATEWAY,
                };
                let (title, description) = auth_error_message(auth.code);
                Self::new(status, title, description)
            }
            DomainError::VerificationFailed => {
                let (title, description) = VERIFICATION_FAILED_MESSAGE;
                Self::new(StatusCode::FORBIDDEN, title, description)
            }
            DomainError::Unauthenticated => Self::unauthenticated(),
            DomainError::Store(StoreError::PermissionDenied { path }) => Self::new(
                StatusCode::FORBIDDEN,
                "Permission Denied",
                format!("Missing or insufficient permissions for {}", path),
            ),
            DomainError::Store(store) => {
                error!("Store failure: {}", store);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.", "Please try again later.")
            }
            DomainError::Suggestion(suggestion) => Self::from_suggestion(suggestion),
            // Validation variants are handled above
            _ => Self::new(StatusCode::BAD_REQUEST, "Invalid Input", err.to_string()),
        }
    }
}

impl From<SuggestionError> for ApiError {
    fn from(err: SuggestionError) -> Self {
        Self::from_suggestion(&err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{AuthError, LanguageModelError};
    use crate::domain::models::transaction::TransactionValidationError;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (TransactionValidationError::EmptyName.into(), StatusCode::BAD_REQUEST),
            (DomainError::NotFound("Savings goal g1".to_string()), StatusCode::NOT_FOUND),
            (DomainError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (DomainError::VerificationFailed, StatusCode::FORBIDDEN),
            (
                StoreError::PermissionDenied { path: "users/x".to_string() }.into(),
                StatusCode::FORBIDDEN,
            ),
            (StoreError::Backend("disk".to_string()).into(), StatusCode::INTERNAL_SERVER_ERROR),
            (
                SuggestionError::Provider(LanguageModelError::EmptyResponse).into(),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_auth_errors_use_user_facing_messages() {
        let err = ApiError::from(DomainError::Auth(AuthError::from_provider_message("EMAIL_EXISTS")));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.title, "Sign Up Failed");
        assert_eq!(err.body.description, "An account with this email already exists.");

        let err = ApiError::from(DomainError::Auth(AuthError::from_provider_message("INVALID_LOGIN_CREDENTIALS")));
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.body.description, "Incorrect email or password.");

        let err = ApiError::from(DomainError::Auth(AuthError::from_provider_message("QUOTA_EXCEEDED")));
        assert_eq!(err.body.title, "An unexpected error occurred.");
    }

    #[test]
    fn test_suggestion_errors_carry_notice() {
        let err = ApiError::from(SuggestionError::InvalidResponse("eof".to_string()));
        assert_eq!(err.body.title, "Error");
        assert!(err.body.description.starts_with("Failed to get AI suggestions: "));
        assert_eq!(err.body.notice.as_deref(), Some(SUGGESTIONS_NOTICE));
    }
}
