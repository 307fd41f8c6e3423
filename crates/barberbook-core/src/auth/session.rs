use anyhow::Result;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::models::User;

/// Email and password sent to `POST /sessions`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// An authenticated session: always both a token and a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Snapshot of the session handle, published to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    /// True until launch rehydration has finished
    pub loading: bool,
    pub session: Option<Session>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            loading: true,
            session: None,
        }
    }
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }
}

/// Whatever turns credentials into a session. Implemented by `ApiClient`.
pub trait SessionBackend: Send + Sync {
    fn create_session<'a>(&'a self, credentials: &'a Credentials) -> BoxFuture<'a, Result<Session>>;
}
