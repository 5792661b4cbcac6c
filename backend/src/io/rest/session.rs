//! Bearer-token extractor for authenticated endpoints.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::domain::models::user::SessionUser;
use crate::io::rest::errors::ApiError;
use crate::AppState;

/// Signed-in user resolved from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub token: String,
    pub user: SessionUser,
}

impl CurrentUser {
    pub fn uid(&self) -> &str {
        &self.user.uid
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(ApiError::unauthenticated)?.to_string();
        let user = state.auth_service.current_user(&token).await?;
        Ok(CurrentUser { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/dashboard");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts_with(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer  "))), None);
        assert_eq!(bearer_token(&parts_with(None)), None);
    }
}
