//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `Auth`: the shared session handle (sign-in, sign-out, update-user,
//!   launch rehydration) that the rest of the app observes
//! - `Storage`: the on-device key-value store the session is mirrored to
//! - `CredentialStore`: optional OS keychain storage for the password
//!
//! The session is kept under two namespaced keys, `token` and `user`.

pub mod context;
pub mod credentials;
pub mod session;
pub mod storage;

pub use context::{Auth, AuthError};
pub use credentials::CredentialStore;
pub use session::{AuthState, Credentials, Session, SessionBackend};
pub use storage::{FileStorage, MemoryStorage, Storage};
