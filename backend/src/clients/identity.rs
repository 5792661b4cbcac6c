//! Client for the hosted identity provider (identity toolkit REST API).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use tracing::{info, warn};

/// Provider error categories the UI knows how to explain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    InvalidEmail,
    UserNotFound,
    WrongPassword,
    EmailAlreadyInUse,
    WeakPassword,
    Other,
}

impl AuthErrorCode {
    /// Classify the `error.message` string returned by the provider
    pub fn from_provider_message(message: &str) -> Self {
        let code = message.split(':').next().unwrap_or_default().trim();
        match code {
            "INVALID_EMAIL" => AuthErrorCode::InvalidEmail,
            "EMAIL_NOT_FOUND" => AuthErrorCode::UserNotFound,
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => AuthErrorCode::WrongPassword,
            "EMAIL_EXISTS" => AuthErrorCode::EmailAlreadyInUse,
            c if c.starts_with("WEAK_PASSWORD") => AuthErrorCode::WeakPassword,
            _ => AuthErrorCode::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorCode::InvalidEmail => "auth/invalid-email",
            AuthErrorCode::UserNotFound => "auth/user-not-found",
            AuthErrorCode::WrongPassword => "auth/wrong-password",
            AuthErrorCode::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthErrorCode::WeakPassword => "auth/weak-password",
            AuthErrorCode::Other => "auth/internal-error",
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct AuthError {
    pub code: AuthErrorCode,
    pub message: String,
}

impl AuthError {
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn from_provider_message(message: &str) -> Self {
        Self::new(AuthErrorCode::from_provider_message(message), message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub id_token: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_user(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError>;

    async fn update_display_name(&self, user: &AuthenticatedUser, display_name: &str) -> Result<(), AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: String,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Clone)]
pub struct FirebaseIdentityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FirebaseIdentityClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{}?key={}", self.base_url, method, self.api_key)
    }

    async fn post<B: Serialize + ?Sized>(&self, method: &str, body: &B) -> Result<serde_json::Value, AuthError> {
        let response = self
            .http
            .post(self.endpoint(method))
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::new(AuthErrorCode::Other, format!("identity provider unreachable: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::new(AuthErrorCode::Other, e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            warn!("Identity provider rejected accounts:{} - {}", method, message);
            return Err(AuthError::from_provider_message(&message));
        }

        serde_json::from_str(&text)
            .map_err(|e| AuthError::new(AuthErrorCode::Other, format!("malformed identity response: {}", e)))
    }

    fn to_user(value: serde_json::Value, fallback_email: &str) -> Result<AuthenticatedUser, AuthError> {
        let account: AccountResponse = serde_json::from_value(value)
            .map_err(|e| AuthError::new(AuthErrorCode::Other, format!("malformed identity response: {}", e)))?;
        Ok(AuthenticatedUser {
            uid: account.local_id,
            email: if account.email.is_empty() {
                fallback_email.to_string()
            } else {
                account.email
            },
            display_name: account.display_name.filter(|name| !name.is_empty()),
            id_token: account.id_token,
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityClient {
    async fn create_user(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        info!("Creating identity account for {}", email);
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let value = self.post("signUp", &body).await?;
        Self::to_user(value, email)
    }

    async fn update_display_name(&self, user: &AuthenticatedUser, display_name: &str) -> Result<(), AuthError> {
        let body = json!({
            "idToken": user.id_token,
            "displayName": display_name,
            "returnSecureToken": false,
        });
        self.post("update", &body).await?;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        info!("Signing in {}", email);
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let value = self.post("signInWithPassword", &body).await?;
        Self::to_user(value, email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_messages_map_to_codes() {
        let cases = [
            ("INVALID_EMAIL", AuthErrorCode::InvalidEmail),
            ("EMAIL_NOT_FOUND", AuthErrorCode::UserNotFound),
            ("INVALID_PASSWORD", AuthErrorCode::WrongPassword),
            ("INVALID_LOGIN_CREDENTIALS", AuthErrorCode::WrongPassword),
            ("EMAIL_EXISTS", AuthErrorCode::EmailAlreadyInUse),
            (
                "WEAK_PASSWORD : Password should be at least 6 characters",
                AuthErrorCode::WeakPassword,
            ),
            ("TOO_MANY_ATTEMPTS_TRY_LATER", AuthErrorCode::Other),
            ("", AuthErrorCode::Other),
        ];
        for (message, expected) in cases {
            assert_eq!(AuthErrorCode::from_provider_message(message), expected, "message {:?}", message);
        }
    }

    #[test]
    fn test_account_response_parsing() {
        let value = json!({
            "localId": "uid-1",
            "email": "",
            "displayName": "",
            "idToken": "tok",
        });
        let user = FirebaseIdentityClient::to_user(value, "juan@example.com").unwrap();
        assert_eq!(user.uid, "uid-1");
        assert_eq!(user.email, "juan@example.com");
        assert!(user.display_name.is_none());
    }

    #[test]
    fn test_endpoint_includes_key() {
        let client = FirebaseIdentityClient::new(reqwest::Client::new(), "https://id.example/v1/", "k");
        assert_eq!(client.endpoint("signUp"), "https://id.example/v1/accounts:signUp?key=k");
    }
}
