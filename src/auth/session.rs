//! Session management: the client-side source of truth for "who is
//! logged in and with what credential".
//!
//! The token and user profile are persisted together on login and
//! cleared together on logout; no valid state holds one without the
//! other. All mutations go through this store — the gateway client
//! reads credentials from here and calls [`SessionStore::logout`] when
//! the backend rejects the token.

// Allow dead code: session operations cover the full auth surface
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::models::User;

use super::store::{KeyValueStore, TOKEN_KEY, USER_KEY};

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Successful login exchange: bearer token, its lifetime, and the
/// authenticated profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Result of the unauthenticated reachability probe.
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub message: String,
}

/// Response from the token verification endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub email: String,
}

/// Clone is cheap: the inner state is behind an Arc, so every clone
/// observes the same session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    base_url: String,
    http: Client,
    store: Box<dyn KeyValueStore>,
}

impl SessionStore {
    /// Create a session store over the given key-value substrate.
    /// The base URL is trimmed of any trailing slash.
    pub fn new(base_url: &str, store: Box<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            inner: Arc::new(Inner {
                base_url: base_url.trim_end_matches('/').to_string(),
                http,
                store,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Exchange credentials for a session. On success the token and
    /// profile are persisted before returning; on any failure nothing
    /// is stored.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/api/v1/auth/login/", self.inner.base_url);
        debug!(email, %url, "Attempting login");

        let response = self
            .inner
            .http
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::InvalidCredentials);
        }
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(ApiError::Validation(
                "Please check your email and password format".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse login response: {}", e)))?;

        self.install(&login.access_token, &login.user);
        info!(user_id = login.user.id, role = %login.user.role, "Login successful");
        Ok(login)
    }

    /// Persist token and profile together: no valid state holds one
    /// without the other. Crate-visible so demo mode can seat a
    /// fixture session without a network exchange.
    pub(crate) fn install(&self, token: &str, user: &User) {
        self.inner.store.set(TOKEN_KEY, token);
        match serde_json::to_string(user) {
            Ok(serialized) => self.inner.store.set(USER_KEY, &serialized),
            Err(e) => warn!(error = %e, "Failed to serialize user profile"),
        }
    }

    /// Clear the session. Never fails, idempotent.
    pub fn logout(&self) {
        self.inner.store.remove(TOKEN_KEY);
        self.inner.store.remove(USER_KEY);
    }

    /// Pure read, no network call.
    pub fn token(&self) -> Option<String> {
        self.inner.store.get(TOKEN_KEY)
    }

    /// Pure read of the cached profile. A profile that no longer
    /// parses (e.g. written by a different version) reads as absent.
    pub fn user(&self) -> Option<User> {
        let raw = self.inner.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Stored user profile is unreadable");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Header set for outbound requests: empty without a token, exactly
    /// one bearer header with one.
    pub fn auth_headers(&self) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.token() {
            match header::HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(header::AUTHORIZATION, value);
                }
                Err(e) => warn!(error = %e, "Stored token is not a valid header value"),
            }
        }
        headers
    }

    /// Unauthenticated reachability probe against the health endpoint.
    /// Diagnostic only — never returns an error.
    pub async fn test_connection(&self) -> ConnectionStatus {
        let url = format!("{}/health", self.inner.base_url);
        debug!(%url, "Testing API connection");

        match self
            .inner
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => ConnectionStatus {
                connected: true,
                message: "Connected successfully".to_string(),
            },
            Ok(response) => ConnectionStatus {
                connected: false,
                message: format!("Server responded with status {}", response.status().as_u16()),
            },
            Err(e) => {
                debug!(error = %e, "Connection test failed");
                ConnectionStatus {
                    connected: false,
                    message: "Cannot reach server. Check your connection and the API URL.".to_string(),
                }
            }
        }
    }

    /// Ask the backend whether the stored token is still accepted.
    /// A rejected token clears the session before surfacing the error.
    pub async fn verify(&self) -> Result<VerifyResponse, ApiError> {
        let url = format!("{}/api/v1/auth/verify", self.inner.base_url);
        let response = self
            .inner
            .http
            .get(&url)
            .headers(self.auth_headers())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.logout();
            return Err(ApiError::SessionExpired);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse verify response: {}", e)))
    }

    /// Request a password reset email. All failures collapse into one
    /// user-facing message; there is nothing actionable in the detail.
    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let url = format!("{}/api/v1/auth/forgot-password/", self.inner.base_url);
        let response = self
            .inner
            .http
            .post(&url)
            .json(&json!({ "email": email }))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::Server("Failed to send reset email".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::MemoryStore;
    use crate::models::Role;

    fn store() -> SessionStore {
        SessionStore::new("http://localhost:8000/", Box::new(MemoryStore::new()))
            .expect("Failed to build session store")
    }

    fn profile() -> User {
        serde_json::from_str(
            r#"{"id":1,"name":"Jane","email":"student@demo.com","role":"student"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(store().base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_fresh_store_has_no_session() {
        let session = store();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_persist_then_logout() {
        let session = store();
        session.install("t1", &profile());

        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("t1"));
        assert_eq!(session.user().map(|u| u.role), Some(Role::Student));

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());

        // Logout is idempotent
        session.logout();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_auth_headers_empty_without_token() {
        let session = store();
        assert!(session.auth_headers().is_empty());
        // Idempotent across repeated calls
        assert!(session.auth_headers().is_empty());
    }

    #[test]
    fn test_auth_headers_single_bearer_with_token() {
        let session = store();
        session.install("t1", &profile());

        let headers = session.auth_headers();
        assert_eq!(headers.len(), 1);
        assert_eq!(
            headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer t1")
        );

        // Idempotent across repeated calls
        assert_eq!(session.auth_headers().len(), 1);
    }

    #[test]
    fn test_login_response_parses_fully_populated_session() {
        let json = r#"{
            "access_token": "t1",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": {"id": 1, "name": "Jane", "email": "student@demo.com", "role": "student"}
        }"#;
        let login: LoginResponse = serde_json::from_str(json).expect("Failed to parse login");
        assert_eq!(login.access_token, "t1");
        assert_eq!(login.user.role, Role::Student);
        assert_eq!(login.expires_in, 3600);
    }

    #[test]
    fn test_unreadable_stored_profile_reads_as_absent() {
        let session = store();
        session.inner.store.set(USER_KEY, "not json");
        assert!(session.user().is_none());
    }
}
