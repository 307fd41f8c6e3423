//! API client for communicating with the booking REST API.
//!
//! This module provides the `ApiClient` struct for signing in, registering,
//! updating the profile and avatar, listing providers and booking
//! appointments.

use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt};
use reqwest::{header, multipart, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::auth::{Credentials, Session, SessionBackend};
use crate::models::{Appointment, NewAppointment, NewUser, ProfileUpdate, Provider, User};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL used when neither the config nor the environment names one
pub const DEFAULT_API_URL: &str = "http://localhost:3333";

/// Content type the avatar upload is sent as
const AVATAR_MIME: &str = "image/jpeg";

#[derive(Debug, Deserialize)]
struct SessionResponse {
    token: String,
    user: User,
}

/// API client for the booking service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T> {
        let response = request
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        self.send(self.client.get(&url), &url).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        self.send(self.client.post(&url).json(body), &url).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        self.send(self.client.put(&url).json(body), &url).await
    }

    // ===== Session =====

    /// Exchange credentials for a token and the signed-in user
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        let response: SessionResponse = self
            .post("/sessions", credentials)
            .await
            .context("Failed to authenticate")?;

        debug!(user_id = %response.user.id, "Session created");
        Ok(Session {
            token: response.token,
            user: response.user,
        })
    }

    // ===== Users =====

    /// Register a new account
    pub async fn create_user(&self, new_user: &NewUser) -> Result<User> {
        self.post("/users", new_user)
            .await
            .context("Failed to create account")
    }

    /// Update name, email and optionally the password of the signed-in user
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.put("/profile", update)
            .await
            .context("Failed to update profile")
    }

    /// Upload a new avatar image for the signed-in user
    pub async fn update_avatar(&self, user: &User, image: Vec<u8>) -> Result<User> {
        let part = multipart::Part::bytes(image)
            .file_name(user.avatar_file_name())
            .mime_str(AVATAR_MIME)?;
        let form = multipart::Form::new().part("avatar", part);

        let url = self.url("/users/avatar");
        self.send(self.client.patch(&url).multipart(form), &url)
            .await
            .context("Failed to update avatar")
    }

    // ===== Providers & Appointments =====

    /// Fetch every provider available for booking
    pub async fn list_providers(&self) -> Result<Vec<Provider>> {
        self.get("/providers")
            .await
            .context("Failed to fetch providers")
    }

    /// Book an appointment with a provider
    pub async fn create_appointment(&self, appointment: &NewAppointment) -> Result<Appointment> {
        self.post("/appointments", appointment)
            .await
            .context("Failed to create appointment")
    }
}

impl SessionBackend for ApiClient {
    fn create_session<'a>(&'a self, credentials: &'a Credentials) -> BoxFuture<'a, Result<Session>> {
        self.authenticate(credentials).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let api = ApiClient::new("http://localhost:3333/").expect("client should build");
        assert_eq!(api.base_url(), "http://localhost:3333");
        assert_eq!(api.url("/providers"), "http://localhost:3333/providers");
        assert_eq!(api.url("users/avatar"), "http://localhost:3333/users/avatar");
    }

    #[test]
    fn test_with_token_sets_bearer_header() {
        let api = ApiClient::new(DEFAULT_API_URL).expect("client should build");
        assert!(!api.has_token());
        assert!(api.auth_headers().expect("headers").is_empty());

        let authed = api.with_token("abc123".to_string());
        assert!(authed.has_token());
        assert_eq!(authed.base_url(), api.base_url());
        let headers = authed.auth_headers().expect("headers");
        assert_eq!(
            headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer abc123")
        );
    }

    #[test]
    fn test_parse_session_response() {
        let json = r#"{"user":{"id":"u1","name":"Jo Silva","email":"jo@example.com","avatar_url":null},"token":"jwt.token"}"#;
        let resp: SessionResponse = serde_json::from_str(json).expect("session should parse");
        assert_eq!(resp.token, "jwt.token");
        assert_eq!(resp.user.first_name(), "Jo");
    }
}
