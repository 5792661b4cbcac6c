use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::models::user::SessionUser;

const DEFAULT_TTL: Duration = Duration::from_secs(12 * 60 * 60);

struct Session {
    user: SessionUser,
    issued_at: Instant,
}

/// In-memory bearer sessions: token -> signed-in user
///
/// A session expires `ttl` after it was opened. Expired sessions are dropped
/// when their token is resolved and swept whenever a new session opens.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl SessionStore {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Open a session and return its token
    pub async fn open(&self, user: SessionUser) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, session| session.issued_at.elapsed() < self.ttl);
        if sessions.len() < before {
            debug!("Dropped {} expired sessions", before - sessions.len());
        }

        sessions.insert(
            token.clone(),
            Session {
                user,
                issued_at: Instant::now(),
            },
        );
        token
    }

    pub async fn resolve(&self, token: &str) -> Option<SessionUser> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(token) {
            Some(session) if session.issued_at.elapsed() < self.ttl => Some(session.user.clone()),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// Close a session; `false` if the token was unknown
    pub async fn close(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(uid: &str) -> SessionUser {
        SessionUser {
            uid: uid.to_string(),
            email: format!("{}@example.com", uid),
            display_name: uid.to_string(),
        }
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let sessions = SessionStore::default();

        let token = sessions.open(user("juan")).await;
        assert_eq!(sessions.resolve(&token).await, Some(user("juan")));
        assert!(sessions.close(&token).await);
        assert!(sessions.resolve(&token).await.is_none());
        assert!(!sessions.close(&token).await);
    }

    #[tokio::test]
    async fn test_sessions_expire_after_ttl() {
        let sessions = SessionStore::with_ttl(Duration::from_millis(50));
        let stale = sessions.open(user("juan")).await;
        let also_stale = sessions.open(user("maria")).await;
        assert!(sessions.resolve(&stale).await.is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(sessions.resolve(&stale).await.is_none());
        assert_eq!(sessions.sessions.read().await.len(), 1);

        // Opening a session sweeps the remaining expired one
        let fresh = sessions.open(user("ana")).await;
        assert_eq!(sessions.sessions.read().await.len(), 1);
        assert!(sessions.resolve(&also_stale).await.is_none());
        assert_eq!(sessions.resolve(&fresh).await, Some(user("ana")));
    }
}
