//! REST API client module for the booking service.
//!
//! This module provides the `ApiClient` for the session, registration,
//! profile, provider and appointment endpoints.
//!
//! Requests made after sign-in carry the session token as a bearer token.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
