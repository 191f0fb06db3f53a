//! API gateway client for the hostel management REST backend.
//!
//! Every read or mutation of backend-owned resources goes through
//! [`ApiClient`]. The client attaches the current session's bearer
//! token to each call, normalizes error handling, and handles token
//! rejection in exactly one place: a 401 clears the session and
//! surfaces [`ApiError::SessionExpired`], which the view layer answers
//! by returning to the login screen.
//!
//! Failure semantics are fail-fast: one attempt per call, a fixed
//! timeout, no retries. Callers decide whether to offer a retry.

// Allow dead code: the client carries the full backend contract, not
// just the operations the current views invoke
#![allow(dead_code)]

use std::time::Duration;

use reqwest::{header, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::demo;
use crate::models::{
    HallAssignment, MaintenanceRequest, MaintenanceRequestUpdate, NewMaintenanceRequest, NewUser,
    RequestFilter, RequestStatus, Role, User, UserFilter, UserUpdate,
};

use super::ApiError;

/// All resource endpoints live under this versioned prefix.
const API_PREFIX: &str = "/api/v1";

/// HTTP request timeout in seconds.
/// A hung request must not pin a view's loading indicator forever.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Response body for DELETE operations.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the session handle is itself a shared reference.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionStore,
    demo_mode: bool,
}

impl ApiClient {
    /// Create a client over the given base URL (trailing slash trimmed)
    /// with the session store that supplies credentials.
    pub fn new(base_url: &str, session: SessionStore) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            demo_mode: false,
        })
    }

    /// Substitute fixture data for every endpoint instead of touching
    /// the network. Used by `--demo` and by environments without a
    /// reachable backend.
    pub fn with_demo_data(mut self) -> Self {
        self.demo_mode = true;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Root an endpoint under the versioned prefix, adding it when the
    /// caller passed a bare resource path and never doubling it.
    fn versioned(endpoint: &str) -> String {
        if endpoint.starts_with(API_PREFIX) {
            endpoint.to_string()
        } else {
            format!("{}{}", API_PREFIX, endpoint)
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, Self::versioned(endpoint))
    }

    fn encode<B: Serialize>(body: &B) -> Result<Value, ApiError> {
        serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to encode request body: {}", e)))
    }

    /// The single choke point every operation goes through.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        debug!(%method, %url, "API request");

        let mut request = self
            .client
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json")
            .headers(self.session.auth_headers());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Token rejected mid-session: clear the stored credentials
            // before surfacing, so every caller lands back on login.
            warn!(%url, "Token rejected, clearing session");
            self.session.logout();
            return Err(ApiError::SessionExpired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", url, e)))
    }

    // ===== Users =====

    pub async fn users(&self, filter: &UserFilter) -> Result<Vec<User>, ApiError> {
        if self.demo_mode {
            return Ok(demo::filter_users(filter));
        }
        self.request(Method::GET, "/users", &filter.to_query(), None)
            .await
    }

    pub async fn user(&self, user_id: i64) -> Result<User, ApiError> {
        if self.demo_mode {
            return demo::user(user_id);
        }
        self.request(Method::GET, &format!("/users/{}", user_id), &[], None)
            .await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        self.request(Method::POST, "/users", &[], Some(Self::encode(user)?))
            .await
    }

    pub async fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<User, ApiError> {
        self.request(
            Method::PUT,
            &format!("/users/{}", user_id),
            &[],
            Some(Self::encode(update)?),
        )
        .await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<DeleteResponse, ApiError> {
        self.request(Method::DELETE, &format!("/users/{}", user_id), &[], None)
            .await
    }

    pub async fn students(&self) -> Result<Vec<User>, ApiError> {
        self.users(&UserFilter::with_role(Role::Student)).await
    }

    pub async fn officers(&self) -> Result<Vec<User>, ApiError> {
        self.users(&UserFilter::with_role(Role::Officer)).await
    }

    pub async fn hall_officers(&self) -> Result<Vec<User>, ApiError> {
        self.users(&UserFilter::with_role(Role::HallOfficer)).await
    }

    pub async fn admins(&self) -> Result<Vec<User>, ApiError> {
        self.users(&UserFilter::with_role(Role::Admin)).await
    }

    /// The hall a hall officer is assigned to; `hall_id` is null for
    /// every other role and for unassigned officers.
    pub async fn hall_officer_hall(&self, user_id: i64) -> Result<HallAssignment, ApiError> {
        if self.demo_mode {
            return Ok(demo::hall_assignment(user_id));
        }
        self.request(Method::GET, &format!("/users/{}/hall", user_id), &[], None)
            .await
    }

    // ===== Maintenance requests =====

    pub async fn maintenance_requests(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<MaintenanceRequest>, ApiError> {
        if self.demo_mode {
            return Ok(demo::filter_requests(filter));
        }
        self.request(Method::GET, "/maintenance-requests/", &filter.to_query(), None)
            .await
    }

    pub async fn maintenance_request(&self, request_id: i64) -> Result<MaintenanceRequest, ApiError> {
        if self.demo_mode {
            return demo::request(request_id);
        }
        self.request(
            Method::GET,
            &format!("/maintenance-requests/{}", request_id),
            &[],
            None,
        )
        .await
    }

    pub async fn create_maintenance_request(
        &self,
        request: &NewMaintenanceRequest,
    ) -> Result<MaintenanceRequest, ApiError> {
        if self.demo_mode {
            return Ok(demo::created_request(request));
        }
        self.request(
            Method::POST,
            "/maintenance-requests/",
            &[],
            Some(Self::encode(request)?),
        )
        .await
    }

    pub async fn update_maintenance_request(
        &self,
        request_id: i64,
        update: &MaintenanceRequestUpdate,
    ) -> Result<MaintenanceRequest, ApiError> {
        self.request(
            Method::PUT,
            &format!("/maintenance-requests/{}", request_id),
            &[],
            Some(Self::encode(update)?),
        )
        .await
    }

    pub async fn delete_maintenance_request(&self, request_id: i64) -> Result<DeleteResponse, ApiError> {
        self.request(
            Method::DELETE,
            &format!("/maintenance-requests/{}", request_id),
            &[],
            None,
        )
        .await
    }

    /// Server-side filtered view of everything not yet completed.
    pub async fn active_requests(&self) -> Result<Vec<MaintenanceRequest>, ApiError> {
        if self.demo_mode {
            return Ok(demo::active_requests());
        }
        self.request(Method::GET, "/maintenance-requests/active", &[], None)
            .await
    }

    pub async fn pending_requests(&self) -> Result<Vec<MaintenanceRequest>, ApiError> {
        self.maintenance_requests(&RequestFilter::with_status(RequestStatus::Pending))
            .await
    }

    pub async fn completed_requests(&self) -> Result<Vec<MaintenanceRequest>, ApiError> {
        self.maintenance_requests(&RequestFilter::with_status(RequestStatus::Completed))
            .await
    }

    pub async fn requests_by_student(&self, student_id: i64) -> Result<Vec<MaintenanceRequest>, ApiError> {
        self.maintenance_requests(&RequestFilter::for_student(student_id))
            .await
    }

    pub async fn requests_by_hall(&self, hall_id: i64) -> Result<Vec<MaintenanceRequest>, ApiError> {
        self.maintenance_requests(&RequestFilter::for_hall(hall_id))
            .await
    }

    // ===== Status transitions =====
    //
    // All transitions are bodyless PATCH calls keyed by request id and
    // return the updated resource. Which transitions are legal from
    // which state is the backend's decision; the client only gates
    // which actions it offers.

    async fn transition(&self, request_id: i64, path: &str, status: RequestStatus) -> Result<MaintenanceRequest, ApiError> {
        if self.demo_mode {
            return demo::transition(request_id, status);
        }
        self.request(
            Method::PATCH,
            &format!("/maintenance-requests/{}/{}", request_id, path),
            &[],
            None,
        )
        .await
    }

    /// Set a request to an arbitrary status from the known table.
    pub async fn set_request_status(
        &self,
        request_id: i64,
        status: RequestStatus,
    ) -> Result<MaintenanceRequest, ApiError> {
        self.transition(request_id, &format!("status/{}", status.id()), status)
            .await
    }

    pub async fn mark_request_in_progress(&self, request_id: i64) -> Result<MaintenanceRequest, ApiError> {
        self.transition(request_id, "in-progress", RequestStatus::InProgress)
            .await
    }

    pub async fn mark_request_under_review(&self, request_id: i64) -> Result<MaintenanceRequest, ApiError> {
        self.transition(request_id, "under-review", RequestStatus::UnderReview)
            .await
    }

    pub async fn mark_request_complete(&self, request_id: i64) -> Result<MaintenanceRequest, ApiError> {
        self.transition(request_id, "complete", RequestStatus::Completed)
            .await
    }

    /// Return a completed request to the start of the lifecycle.
    pub async fn reopen_request(&self, request_id: i64) -> Result<MaintenanceRequest, ApiError> {
        self.transition(request_id, "reopen", RequestStatus::Pending)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStore;
    use crate::models::DashboardStats;

    fn client(demo: bool) -> ApiClient {
        let session = SessionStore::new("http://localhost:8000", Box::new(MemoryStore::new()))
            .expect("Failed to build session store");
        let client = ApiClient::new("http://localhost:8000/", session).expect("Failed to build client");
        if demo {
            client.with_demo_data()
        } else {
            client
        }
    }

    #[test]
    fn test_versioned_prefix_added_once() {
        assert_eq!(ApiClient::versioned("/users"), "/api/v1/users");
        assert_eq!(ApiClient::versioned("/api/v1/users"), "/api/v1/users");
        assert_eq!(
            ApiClient::versioned("/maintenance-requests/active"),
            "/api/v1/maintenance-requests/active"
        );
    }

    #[test]
    fn test_url_has_exactly_one_prefix() {
        let client = client(false);
        for endpoint in ["/users", "/api/v1/users"] {
            let url = client.url(endpoint);
            assert_eq!(url, "http://localhost:8000/api/v1/users");
            assert_eq!(url.matches("/api/v1").count(), 1);
        }
    }

    #[tokio::test]
    async fn test_demo_requests_respect_status_filter() {
        let client = client(true);
        let pending = client.pending_requests().await.unwrap();
        let completed = client.completed_requests().await.unwrap();

        assert!(pending.iter().all(|r| r.status_id == RequestStatus::Pending.id()));
        assert!(completed.iter().all(|r| r.status_id == RequestStatus::Completed.id()));
        assert!(!pending.is_empty());
    }

    #[tokio::test]
    async fn test_demo_complete_transition_updates_counters() {
        let client = client(true);
        let requests = client
            .maintenance_requests(&RequestFilter::default())
            .await
            .unwrap();
        let before = DashboardStats::from_requests(&requests);

        let target = requests.iter().find(|r| r.is_active()).expect("No active fixture");
        let updated = client.mark_request_complete(target.issue_id).await.unwrap();
        assert_eq!(updated.status_name(), "Completed");

        // Apply the mutation locally, the way the dashboard does, and
        // recompute without a reload.
        let mut after_requests = requests.clone();
        if let Some(slot) = after_requests.iter_mut().find(|r| r.issue_id == updated.issue_id) {
            *slot = updated;
        }
        let after = DashboardStats::from_requests(&after_requests);
        assert_eq!(after.completed, before.completed + 1);
        assert_eq!(after.active, before.active - 1);
    }

    #[tokio::test]
    async fn test_demo_transition_unknown_id_is_not_found() {
        let client = client(true);
        let err = client.mark_request_in_progress(99_999).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
