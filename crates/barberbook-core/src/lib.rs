//! Barberbook core library - session, API client, models and forms.
//!
//! The terminal client in `barberbook-tui` builds on this crate; nothing here
//! depends on a UI toolkit.

pub mod api;
pub mod auth;
pub mod config;
pub mod forms;
pub mod models;
pub mod routes;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{Auth, AuthState, Credentials, Session};
pub use config::Config;
pub use routes::{Navigator, Route, Screen};
