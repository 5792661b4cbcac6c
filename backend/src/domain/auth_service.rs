//! Sign-up and sign-in against the identity provider.
//!
//! ## Sign-up flow
//!
//! 1. reCAPTCHA check (when a provider is configured)
//! 2. Create the credential
//! 3. Set the display name
//! 4. One batch: profile document, default budgets, default transactions.
//!    The batch is committed non-blocking; a failure surfaces on the
//!    permission-error channel, not as a sign-up error.
//!
//! Both sign-up and sign-in open a server session whose bearer token the
//! REST layer hands back to the browser.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::{AuthErrorCode, ChallengeVerifier, IdentityProvider};
use crate::domain::commands::auth::{SignInCommand, SignUpCommand};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::user::{resolve_display_name, SessionUser, UserProfile};
use crate::domain::seed_data;
use crate::domain::session_store::SessionStore;
use crate::storage::{
    collections, to_document_data, CollectionRef, DocumentRef, DocumentStore, ErrorEmitter, NonBlockingWriter,
    PendingWrite, UserScope, WriteBatch,
};

/// Title and description shown to the user for an auth failure
pub fn auth_error_message(code: AuthErrorCode) -> (&'static str, &'static str) {
    match code {
        AuthErrorCode::InvalidEmail => ("Invalid Email", "Please enter a valid email address."),
        AuthErrorCode::UserNotFound | AuthErrorCode::WrongPassword => {
            ("Sign In Failed", "Incorrect email or password.")
        }
        AuthErrorCode::EmailAlreadyInUse => ("Sign Up Failed", "An account with this email already exists."),
        AuthErrorCode::WeakPassword => ("Sign Up Failed", "Password should be at least 6 characters."),
        AuthErrorCode::Other => ("An unexpected error occurred.", "Please try again later."),
    }
}

pub const VERIFICATION_FAILED_MESSAGE: (&str, &str) =
    ("Verification Failed", "Please complete the reCAPTCHA challenge.");

#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Clone)]
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    verifier: Arc<dyn ChallengeVerifier>,
    store: Arc<dyn DocumentStore>,
    emitter: ErrorEmitter,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        verifier: Arc<dyn ChallengeVerifier>,
        store: Arc<dyn DocumentStore>,
        emitter: ErrorEmitter,
        sessions: SessionStore,
    ) -> Self {
        Self {
            identity,
            verifier,
            store,
            emitter,
            sessions,
        }
    }

    async fn check_challenge(&self, token: Option<&str>) -> DomainResult<()> {
        if !self.verifier.is_enabled() {
            return Ok(());
        }
        if self.verifier.verify(token.unwrap_or_default()).await {
            Ok(())
        } else {
            warn!("Rejected auth attempt: reCAPTCHA verification failed");
            Err(DomainError::VerificationFailed)
        }
    }

    /// Create an account, seed its starter data and open a session.
    /// The returned pending write tracks the seed batch.
    pub async fn sign_up(&self, command: SignUpCommand) -> DomainResult<(AuthSession, PendingWrite<usize>)> {
        info!("Sign-up requested for {}", command.email);
        self.check_challenge(command.recaptcha_token.as_deref()).await?;

        let email = command.email.trim().to_string();
        let account = self.identity.create_user(&email, &command.password).await?;
        let display_name = resolve_display_name(command.display_name.as_deref(), &email);
        self.identity.update_display_name(&account, &display_name).await?;

        let seed_write = self.seed_new_user(&account.uid, &account.email, &display_name)?;

        let user = SessionUser {
            uid: account.uid,
            email: account.email,
            display_name,
        };
        let token = self.sessions.open(user.clone()).await;
        info!("Account created for {} ({})", user.email, user.uid);
        Ok((AuthSession { token, user }, seed_write))
    }

    pub async fn sign_in(&self, command: SignInCommand) -> DomainResult<AuthSession> {
        info!("Sign-in requested for {}", command.email);
        self.check_challenge(command.recaptcha_token.as_deref()).await?;

        let account = self.identity.sign_in(command.email.trim(), &command.password).await?;
        let display_name = account
            .display_name
            .clone()
            .unwrap_or_else(|| resolve_display_name(None, &account.email));
        let user = SessionUser {
            uid: account.uid,
            email: account.email,
            display_name,
        };
        let token = self.sessions.open(user.clone()).await;
        Ok(AuthSession { token, user })
    }

    pub async fn sign_out(&self, token: &str) -> bool {
        self.sessions.close(token).await
    }

    pub async fn current_user(&self, token: &str) -> DomainResult<SessionUser> {
        self.sessions.resolve(token).await.ok_or(DomainError::Unauthenticated)
    }

    /// Profile, default budgets and default transactions in one batch
    fn seed_new_user(&self, uid: &str, email: &str, display_name: &str) -> DomainResult<PendingWrite<usize>> {
        let profile = UserProfile {
            id: uid.to_string(),
            email: email.to_string(),
            name: display_name.to_string(),
        };

        let mut batch = WriteBatch::new();
        batch.set_merge(DocumentRef::user(uid), to_document_data(&profile)?);

        let budgets = CollectionRef::for_user(uid, collections::BUDGETS);
        for budget in seed_data::default_budgets() {
            batch.set(budgets.doc(budget.id.clone()), to_document_data(&budget)?);
        }
        let transactions = CollectionRef::for_user(uid, collections::TRANSACTIONS);
        for transaction in seed_data::default_transactions(uid, Utc::now()) {
            batch.set(transactions.doc(transaction.id.clone()), to_document_data(&transaction)?);
        }

        let writer = NonBlockingWriter::new(UserScope::shared(self.store.clone(), uid), self.emitter.clone());
        Ok(writer.commit_batch_non_blocking(batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregation;
    use crate::domain::budget_service::BudgetService;
    use crate::domain::transaction_service::TransactionService;
    use crate::storage::{DbConnection, SqliteDocumentStore};
    use crate::test_support::{FakeIdentity, FakeVerifier};

    async fn setup_test_service(verifier: FakeVerifier) -> (AuthService, Arc<dyn DocumentStore>) {
        let connection = DbConnection::init_test().await.expect("Failed to create test database");
        let store: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(connection));
        let service = AuthService::new(
            Arc::new(FakeIdentity::default()),
            Arc::new(verifier),
            store.clone(),
            ErrorEmitter::new(),
            SessionStore::default(),
        );
        (service, store)
    }

    fn sign_up(email: &str, display_name: Option<&str>) -> SignUpCommand {
        SignUpCommand {
            email: email.to_string(),
            password: "secret123".to_string(),
            display_name: display_name.map(str::to_string),
            recaptcha_token: Some("token".to_string()),
        }
    }

    #[tokio::test]
    async fn test_sign_up_seeds_profile_budgets_and_transactions() {
        let (service, store) = setup_test_service(FakeVerifier::disabled()).await;

        let (session, seed) = service.sign_up(sign_up("juan@example.com", None)).await.unwrap();
        let (count, ok) = seed.wait().await;
        assert!(ok);
        assert_eq!(count, 1 + 8 + 10);
        assert_eq!(session.user.display_name, "juan");

        let uid = session.user.uid.clone();
        let profile = store.get(&DocumentRef::user(&uid)).await.unwrap().unwrap();
        let profile: UserProfile = profile.decode().unwrap();
        assert_eq!(profile.email, "juan@example.com");
        assert_eq!(profile.name, "juan");

        let budgets = BudgetService::new(store.clone()).list(&uid).await.unwrap();
        assert_eq!(budgets.len(), 8);
        let transactions = TransactionService::new(store, ErrorEmitter::new()).list(&uid).await.unwrap();
        assert_eq!(transactions.len(), 10);
        assert!((aggregation::total_income(&transactions) - 5000.0).abs() < 1e-9);

        assert_eq!(service.current_user(&session.token).await.unwrap().uid, uid);
    }

    #[tokio::test]
    async fn test_duplicate_email_maps_to_email_in_use() {
        let (service, _) = setup_test_service(FakeVerifier::disabled()).await;
        service.sign_up(sign_up("juan@example.com", Some("Juan"))).await.unwrap();

        let err = service.sign_up(sign_up("juan@example.com", Some("Juan"))).await.unwrap_err();
        match err {
            DomainError::Auth(auth) => {
                assert_eq!(auth.code, AuthErrorCode::EmailAlreadyInUse);
                assert_eq!(auth_error_message(auth.code).0, "Sign Up Failed");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let (service, _) = setup_test_service(FakeVerifier::disabled()).await;
        service.sign_up(sign_up("maria@example.com", Some("Maria"))).await.unwrap();

        let wrong = service
            .sign_in(SignInCommand {
                email: "maria@example.com".to_string(),
                password: "nope".to_string(),
                recaptcha_token: None,
            })
            .await;
        assert!(matches!(wrong, Err(DomainError::Auth(ref e)) if e.code == AuthErrorCode::WrongPassword));

        let session = service
            .sign_in(SignInCommand {
                email: "maria@example.com".to_string(),
                password: "secret123".to_string(),
                recaptcha_token: None,
            })
            .await
            .unwrap();
        assert_eq!(session.user.display_name, "Maria");
        assert!(service.sign_out(&session.token).await);
        assert!(matches!(
            service.current_user(&session.token).await,
            Err(DomainError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_rejected_challenge_blocks_auth() {
        let (service, _) = setup_test_service(FakeVerifier::rejecting()).await;

        let result = service.sign_up(sign_up("juan@example.com", None)).await;
        assert!(matches!(result, Err(DomainError::VerificationFailed)));

        let result = service
            .sign_in(SignInCommand {
                email: "juan@example.com".to_string(),
                password: "secret123".to_string(),
                recaptcha_token: Some("token".to_string()),
            })
            .await;
        assert!(matches!(result, Err(DomainError::VerificationFailed)));
    }

    #[tokio::test]
    async fn test_enabled_challenge_needs_a_token() {
        let (service, _) = setup_test_service(FakeVerifier::accepting()).await;

        let mut command = sign_up("juan@example.com", None);
        command.recaptcha_token = None;
        let result = service.sign_up(command).await;
        assert!(matches!(result, Err(DomainError::VerificationFailed)));

        let (session, _) = service.sign_up(sign_up("juan@example.com", None)).await.unwrap();
        assert_eq!(session.user.email, "juan@example.com");
    }

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(
            auth_error_message(AuthErrorCode::InvalidEmail),
            ("Invalid Email", "Please enter a valid email address.")
        );
        assert_eq!(auth_error_message(AuthErrorCode::UserNotFound), auth_error_message(AuthErrorCode::WrongPassword));
        assert_eq!(auth_error_message(AuthErrorCode::Other).1, "Please try again later.");
    }
}
