//! The shared session handle.
//!
//! `Auth` owns the in-memory session, mirrors it to `Storage` and publishes
//! every change through a `watch` channel. It starts in the loading state;
//! `load()` rehydrates from storage and clears the flag. Sign-in, sign-out
//! and update-user are the only mutations.

use std::sync::Arc;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::models::User;

use super::session::{AuthState, Credentials, Session, SessionBackend};
use super::storage::Storage;

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "@barberbook:token";

/// Storage key for the JSON-encoded user
pub const USER_KEY: &str = "@barberbook:user";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No user is signed in")]
    NotSignedIn,
}

struct AuthInner {
    backend: Arc<dyn SessionBackend>,
    storage: Arc<dyn Storage>,
    state: watch::Sender<AuthState>,
}

/// Session handle. Clone is cheap and every clone sees the same state.
#[derive(Clone)]
pub struct Auth {
    inner: Arc<AuthInner>,
}

impl Auth {
    pub fn new(backend: Arc<dyn SessionBackend>, storage: Arc<dyn Storage>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            inner: Arc::new(AuthInner {
                backend,
                storage,
                state,
            }),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified on every session change
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token().map(str::to_string)
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().session.is_some()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Rehydrate the session from storage and leave the loading state.
    /// Returns true when a session was restored.
    pub async fn load(&self) -> bool {
        let restored = match self.read_persisted() {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session");
                None
            }
        };

        let found = restored.is_some();
        self.inner.state.send_modify(|state| {
            state.session = restored;
            state.loading = false;
        });
        debug!(restored = found, "Session rehydrated");
        found
    }

    /// Exchange credentials for a session, persist it and publish it.
    /// On failure nothing is persisted and the state is unchanged.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<()> {
        let session = self.inner.backend.create_session(credentials).await?;
        self.persist(&session)?;

        info!(user_id = %session.user.id, "Signed in");
        self.inner.state.send_modify(|state| state.session = Some(session));
        Ok(())
    }

    /// Forget the session in storage and in memory.
    /// Memory is cleared even when a storage removal fails.
    pub async fn sign_out(&self) -> Result<()> {
        let token_removed = self.inner.storage.remove_item(TOKEN_KEY);
        let user_removed = self.inner.storage.remove_item(USER_KEY);

        self.inner.state.send_modify(|state| state.session = None);
        info!("Signed out");

        token_removed.context("Failed to remove persisted token")?;
        user_removed.context("Failed to remove persisted user")?;
        Ok(())
    }

    /// Replace the signed-in user, keeping the current token.
    pub async fn update_user(&self, user: User) -> Result<()> {
        if !self.is_authenticated() {
            return Err(AuthError::NotSignedIn.into());
        }

        let encoded = serde_json::to_string(&user)?;
        self.inner
            .storage
            .set_item(USER_KEY, &encoded)
            .context("Failed to persist user")?;

        debug!(user_id = %user.id, "User updated");
        self.inner.state.send_modify(|state| {
            if let Some(ref mut session) = state.session {
                session.user = user;
            }
        });
        Ok(())
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn read_persisted(&self) -> Result<Option<Session>> {
        let token = self.inner.storage.get_item(TOKEN_KEY)?;
        let user = self.inner.storage.get_item(USER_KEY)?;

        match (token, user) {
            (Some(token), Some(user)) => match serde_json::from_str::<User>(&user) {
                Ok(user) => Ok(Some(Session { token, user })),
                Err(e) => {
                    warn!(error = %e, "Persisted user is not valid JSON, ignoring session");
                    Ok(None)
                }
            },
            (Some(_), None) | (None, Some(_)) => {
                debug!("Partial session in storage, ignoring");
                Ok(None)
            }
            (None, None) => Ok(None),
        }
    }

    /// Write token then user. A failed user write removes the token again so
    /// storage never holds half a session.
    fn persist(&self, session: &Session) -> Result<()> {
        let encoded = serde_json::to_string(&session.user)?;
        let storage = &self.inner.storage;

        storage
            .set_item(TOKEN_KEY, &session.token)
            .context("Failed to persist token")?;

        if let Err(e) = storage.set_item(USER_KEY, &encoded) {
            if let Err(rollback) = storage.remove_item(TOKEN_KEY) {
                warn!(error = %rollback, "Failed to roll back persisted token");
            }
            return Err(e.context("Failed to persist user"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::auth::MemoryStorage;
    use futures::future::{self, BoxFuture, FutureExt};

    /// Accepts one email/password pair and hands out a fixed session
    struct StubBackend {
        password: String,
        session: Session,
    }

    impl SessionBackend for StubBackend {
        fn create_session<'a>(
            &'a self,
            credentials: &'a Credentials,
        ) -> BoxFuture<'a, Result<Session>> {
            let result = if credentials.email == self.session.user.email
                && credentials.password == self.password
            {
                Ok(self.session.clone())
            } else {
                Err(ApiError::Unauthorized("Incorrect email/password combination.".to_string()).into())
            };
            future::ready(result).boxed()
        }
    }

    /// Storage whose writes to one key always fail, and optionally every removal
    struct FailingStorage {
        inner: MemoryStorage,
        failing_key: &'static str,
        fail_removes: bool,
    }

    impl Storage for FailingStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            if key == self.failing_key {
                anyhow::bail!("disk full");
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<()> {
            if self.fail_removes {
                anyhow::bail!("read-only file system");
            }
            self.inner.remove_item(key)
        }
    }

    fn user(name: &str) -> User {
        User {
            id: "u1".to_string(),
            name: name.to_string(),
            email: "jo@example.com".to_string(),
            avatar_url: None,
        }
    }

    fn backend() -> Arc<StubBackend> {
        Arc::new(StubBackend {
            password: "123456".to_string(),
            session: Session {
                token: "jwt-token".to_string(),
                user: user("Jo Silva"),
            },
        })
    }

    fn credentials(password: &str) -> Credentials {
        Credentials {
            email: "jo@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_starts_loading_without_session() {
        let auth = Auth::new(backend(), Arc::new(MemoryStorage::new()));
        assert!(auth.is_loading());
        assert!(auth.user().is_none());
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_load_restores_persisted_session() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(TOKEN_KEY, "stored-token").unwrap();
        storage
            .set_item(USER_KEY, &serde_json::to_string(&user("Jo Silva")).unwrap())
            .unwrap();

        let auth = Auth::new(backend(), storage);
        assert!(auth.load().await);
        assert!(!auth.is_loading());
        assert_eq!(auth.user().map(|u| u.name), Some("Jo Silva".to_string()));
        assert_eq!(auth.token().as_deref(), Some("stored-token"));
    }

    #[tokio::test]
    async fn test_load_with_empty_storage() {
        let auth = Auth::new(backend(), Arc::new(MemoryStorage::new()));
        assert!(!auth.load().await);
        assert!(!auth.is_loading());
        assert!(auth.user().is_none());
    }

    #[tokio::test]
    async fn test_load_ignores_partial_or_corrupt_session() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(TOKEN_KEY, "orphan-token").unwrap();
        let auth = Auth::new(backend(), storage.clone());
        assert!(!auth.load().await);
        assert!(auth.token().is_none());

        storage.set_item(USER_KEY, "{not json").unwrap();
        let auth = Auth::new(backend(), storage);
        assert!(!auth.load().await);
        assert!(!auth.is_loading());
        assert!(auth.user().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_persists_and_publishes() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = Auth::new(backend(), storage.clone());
        auth.load().await;
        let mut rx = auth.subscribe();

        auth.sign_in(&credentials("123456")).await.unwrap();

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.token(), Some("jwt-token"));
        assert_eq!(state.user().map(|u| u.id.as_str()), Some("u1"));

        assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("jwt-token"));
        let stored_user: User =
            serde_json::from_str(&storage.get_item(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored_user, user("Jo Silva"));
    }

    #[tokio::test]
    async fn test_sign_in_failure_leaves_state_untouched() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = Auth::new(backend(), storage.clone());
        auth.load().await;

        let err = auth.sign_in(&credentials("wrong")).await.unwrap_err();
        assert!(err.downcast_ref::<ApiError>().is_some_and(ApiError::is_auth_failure));
        assert!(!auth.is_authenticated());
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get_item(USER_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_in_rolls_back_token_when_user_write_fails() {
        let storage = Arc::new(FailingStorage {
            inner: MemoryStorage::new(),
            failing_key: USER_KEY,
            fail_removes: false,
        });
        let auth = Auth::new(backend(), storage.clone());
        auth.load().await;

        assert!(auth.sign_in(&credentials("123456")).await.is_err());
        assert!(!auth.is_authenticated());
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_out_clears_storage_and_memory() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = Auth::new(backend(), storage.clone());
        auth.load().await;
        auth.sign_in(&credentials("123456")).await.unwrap();

        auth.sign_out().await.unwrap();

        assert!(!auth.is_authenticated());
        assert!(auth.token().is_none());
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get_item(USER_KEY).unwrap(), None);

        // A relaunch finds nothing to restore
        let relaunched = Auth::new(backend(), storage);
        assert!(!relaunched.load().await);
    }

    #[tokio::test]
    async fn test_sign_out_clears_memory_when_storage_fails() {
        let storage = Arc::new(FailingStorage {
            inner: MemoryStorage::new(),
            failing_key: "",
            fail_removes: true,
        });
        let auth = Auth::new(backend(), storage.clone());
        auth.load().await;
        auth.sign_in(&credentials("123456")).await.unwrap();
        let mut rx = auth.subscribe();

        assert!(auth.sign_out().await.is_err());

        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().session.is_none());
        // The stale copy is still on disk
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("jwt-token"));
    }

    #[tokio::test]
    async fn test_update_user_keeps_token() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = Auth::new(backend(), storage.clone());
        auth.load().await;
        auth.sign_in(&credentials("123456")).await.unwrap();

        let mut renamed = user("Joana Silva");
        renamed.avatar_url = Some("http://localhost:3333/files/u1.jpg".to_string());
        auth.update_user(renamed.clone()).await.unwrap();

        assert_eq!(auth.token().as_deref(), Some("jwt-token"));
        assert_eq!(auth.user(), Some(renamed.clone()));
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("jwt-token"));

        // Survives a relaunch
        let relaunched = Auth::new(backend(), storage);
        relaunched.load().await;
        assert_eq!(relaunched.user(), Some(renamed));
    }

    #[tokio::test]
    async fn test_update_user_requires_session() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = Auth::new(backend(), storage.clone());
        auth.load().await;

        let err = auth.update_user(user("Nobody")).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<AuthError>(), Some(AuthError::NotSignedIn)));
        assert_eq!(storage.get_item(USER_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let auth = Auth::new(backend(), Arc::new(MemoryStorage::new()));
        let other = auth.clone();
        auth.load().await;
        auth.sign_in(&credentials("123456")).await.unwrap();
        assert!(!other.is_loading());
        assert!(other.is_authenticated());
    }
}
