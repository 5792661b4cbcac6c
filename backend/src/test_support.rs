//! Fakes for the provider traits and a ready-made in-memory application.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::clients::{
    AuthError, AuthErrorCode, AuthenticatedUser, ChallengeVerifier, GenerationRequest, IdentityProvider,
    LanguageModel, LanguageModelError,
};
use crate::domain::SessionStore;
use crate::storage::{
    CollectionRef, DbConnection, Document, DocumentRef, DocumentStore, ErrorEmitter, SqliteDocumentStore, StoreError,
    WriteBatch,
};
use crate::AppState;

struct FakeAccount {
    uid: String,
    password: String,
    display_name: Option<String>,
}

/// Identity provider backed by a map of email -> account
#[derive(Default)]
pub struct FakeIdentity {
    accounts: Mutex<HashMap<String, FakeAccount>>,
}

impl FakeIdentity {
    fn authenticated(email: &str, account: &FakeAccount) -> AuthenticatedUser {
        AuthenticatedUser {
            uid: account.uid.clone(),
            email: email.to_string(),
            display_name: account.display_name.clone(),
            id_token: format!("id-token-{}", account.uid),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn create_user(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        if !email.contains('@') {
            return Err(AuthError::new(AuthErrorCode::InvalidEmail, "INVALID_EMAIL"));
        }
        if password.len() < 6 {
            return Err(AuthError::new(AuthErrorCode::WeakPassword, "WEAK_PASSWORD"));
        }
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(AuthError::new(AuthErrorCode::EmailAlreadyInUse, "EMAIL_EXISTS"));
        }
        let account = FakeAccount {
            uid: uuid::Uuid::new_v4().to_string(),
            password: password.to_string(),
            display_name: None,
        };
        let user = Self::authenticated(email, &account);
        accounts.insert(email.to_string(), account);
        Ok(user)
    }

    async fn update_display_name(&self, user: &AuthenticatedUser, display_name: &str) -> Result<(), AuthError> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.get_mut(&user.email) {
            Some(account) => {
                account.display_name = Some(display_name.to_string());
                Ok(())
            }
            None => Err(AuthError::new(AuthErrorCode::UserNotFound, "USER_NOT_FOUND")),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            None => Err(AuthError::new(AuthErrorCode::UserNotFound, "EMAIL_NOT_FOUND")),
            Some(account) if account.password != password => {
                Err(AuthError::new(AuthErrorCode::WrongPassword, "INVALID_PASSWORD"))
            }
            Some(account) => Ok(Self::authenticated(email, account)),
        }
    }
}

/// Challenge verifier with a fixed answer
pub struct FakeVerifier {
    enabled: bool,
    accept: bool,
}

impl FakeVerifier {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            accept: false,
        }
    }

    pub fn rejecting() -> Self {
        Self {
            enabled: true,
            accept: false,
        }
    }

    pub fn accepting() -> Self {
        Self {
            enabled: true,
            accept: true,
        }
    }
}

#[async_trait]
impl ChallengeVerifier for FakeVerifier {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn verify(&self, token: &str) -> bool {
        self.enabled && self.accept && !token.is_empty()
    }
}

/// Language model that replays one canned answer and records prompts
pub struct FakeLanguageModel {
    answer: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeLanguageModel {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for FakeLanguageModel {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LanguageModelError> {
        self.prompts.lock().unwrap().push(request.prompt);
        self.answer
            .clone()
            .ok_or_else(|| LanguageModelError::Request("connection refused".to_string()))
    }
}

/// Store that reads through to `inner` but fails queries or commits on demand
pub struct FailingStore {
    inner: Arc<dyn DocumentStore>,
    fail_queries: bool,
    fail_commits: bool,
}

impl FailingStore {
    pub fn failing_queries(inner: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner,
            fail_queries: true,
            fail_commits: false,
        }
    }

    pub fn failing_commits(inner: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner,
            fail_queries: false,
            fail_commits: true,
        }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, doc: &DocumentRef) -> Result<Option<Document>, StoreError> {
        self.inner.get(doc).await
    }

    async fn list(&self, collection: &CollectionRef) -> Result<Vec<Document>, StoreError> {
        self.inner.list(collection).await
    }

    async fn query_eq(
        &self,
        collection: &CollectionRef,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        if self.fail_queries {
            return Err(StoreError::Backend("query unavailable".to_string()));
        }
        self.inner.query_eq(collection, field, value).await
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if self.fail_commits {
            return Err(StoreError::Backend("disk full".to_string()));
        }
        self.inner.commit(batch).await
    }
}

/// Application state over a fresh in-memory database and fake providers
pub async fn test_app_state(verifier: FakeVerifier, model: FakeLanguageModel) -> AppState {
    let connection = DbConnection::init_test().await.expect("Failed to create test database");
    let store: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(connection));
    AppState::new(
        store,
        ErrorEmitter::new(),
        Arc::new(FakeIdentity::default()),
        Arc::new(verifier),
        Arc::new(model),
        SessionStore::default(),
    )
}
