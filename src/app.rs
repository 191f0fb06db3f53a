//! Application state management for dormdesk.
//!
//! This module contains the core `App` struct that owns the session
//! store, the gateway client, the fetched collections, and the derived
//! dashboard counters. The event loop mutates this state through the
//! methods here; rendering only ever reads it.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{CredentialStore, FileStore, MemoryStore, SessionStore};
use crate::config::Config;
use crate::demo;
use crate::models::{
    DashboardStats, MaintenanceRequest, NewMaintenanceRequest, RequestStatus, Role, User,
    UserFilter, CATEGORY_CHOICES,
};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for email input.
/// Institutional addresses fit comfortably in 64 characters.
const MAX_EMAIL_LENGTH: usize = 64;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for a request description.
const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Number of rows to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Token installed for demo sessions; never sent anywhere because demo
/// mode serves fixtures instead of network calls.
const DEMO_TOKEN: &str = "demo-token";

// ============================================================================
// UI State Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    LoggingIn,
    Normal,
    NewRequest,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Main navigation tabs. Which of them exist depends on the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Requests,
    Users,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Requests => "Requests",
            Tab::Users => "Users",
        }
    }
}

/// The tab set a role gets to see. Only admins manage accounts.
pub fn tabs_for(role: Role) -> &'static [Tab] {
    match role {
        Role::Admin => &[Tab::Overview, Tab::Requests, Tab::Users],
        _ => &[Tab::Overview, Tab::Requests],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Description,
    Availability,
    Category,
}

/// The transition actions a staff dashboard can offer on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    InProgress,
    UnderReview,
    Complete,
    Reopen,
}

impl StatusAction {
    pub fn label(&self) -> &'static str {
        match self {
            StatusAction::InProgress => "mark in progress",
            StatusAction::UnderReview => "mark under review",
            StatusAction::Complete => "mark complete",
            StatusAction::Reopen => "reopen",
        }
    }

    /// Whether this action is offered for a request in the given state.
    /// Reopen is only offered on completed requests, everything else
    /// only while the request is still active. Legality of the actual
    /// transition stays with the backend.
    pub fn offered_for(&self, status: Option<RequestStatus>) -> bool {
        let completed = matches!(status, Some(RequestStatus::Completed));
        match self {
            StatusAction::Reopen => completed,
            _ => !completed,
        }
    }
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub config: Config,
    pub session: SessionStore,
    pub client: ApiClient,
    pub demo_mode: bool,

    pub state: AppState,
    pub current_tab: Tab,
    pub role: Role,
    pub user: Option<User>,

    pub requests: Vec<MaintenanceRequest>,
    pub users: Vec<User>,
    pub stats: DashboardStats,
    pub request_selection: usize,
    pub user_selection: usize,

    pub loading: bool,
    pub status_message: Option<String>,
    pub error_message: Option<String>,

    // Login form
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // New-request form
    pub form_description: String,
    pub form_availability: String,
    pub form_category: usize,
    pub form_focus: FormFocus,
}

impl App {
    /// Build the app: resolve the backend URL, wire the session store
    /// and gateway client together, and either restore the persisted
    /// session or land on the login screen. A demo role skips the
    /// backend entirely.
    pub async fn new(demo_role: Option<Role>) -> Result<Self> {
        let config = Config::load().unwrap_or_default();
        let base_url = config.resolved_base_url();
        let demo_mode = demo_role.is_some();

        // Demo sessions live in memory only; real sessions persist.
        let session = if demo_mode {
            SessionStore::new(&base_url, Box::new(MemoryStore::new()))?
        } else {
            SessionStore::new(&base_url, Box::new(FileStore::new()))?
        };

        let mut client = ApiClient::new(&base_url, session.clone())?;
        if demo_mode {
            client = client.with_demo_data();
        }

        let mut app = Self {
            config,
            session,
            client,
            demo_mode,
            state: AppState::LoggingIn,
            current_tab: Tab::Overview,
            role: Role::Student,
            user: None,
            requests: Vec::new(),
            users: Vec::new(),
            stats: DashboardStats::default(),
            request_selection: 0,
            user_selection: 0,
            loading: false,
            status_message: None,
            error_message: None,
            login_email: String::new(),
            login_password: String::new(),
            login_focus: LoginFocus::Email,
            login_error: None,
            form_description: String::new(),
            form_availability: String::new(),
            form_category: 0,
            form_focus: FormFocus::Description,
        };

        if let Some(role) = demo_role {
            app.enter_demo_session(role);
            app.load_dashboard().await;
        } else if app.session.is_authenticated() {
            app.state = AppState::Normal;
            app.load_dashboard().await;
        } else {
            app.start_login();
        }

        Ok(app)
    }

    /// Install the demo account matching the requested role.
    fn enter_demo_session(&mut self, role: Role) {
        let user = demo::users()
            .into_iter()
            .find(|u| u.role == role)
            .unwrap_or_else(|| demo::users().remove(0));
        info!(role = %user.role, "Starting demo session");
        self.session.install(DEMO_TOKEN, &user);
        self.state = AppState::Normal;
    }

    // ===== Login =====

    /// Switch to the login screen, prefilled from the last session.
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_password.clear();
        if let Some(ref email) = self.config.last_email {
            self.login_email = email.clone();
            // Remember-me: the keychain may legitimately have nothing
            if let Ok(password) = CredentialStore::get_password(email) {
                self.login_password = password;
            }
        }
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
    }

    pub async fn submit_login(&mut self) {
        let email = self.login_email.trim().to_string();
        if email.is_empty() || self.login_password.is_empty() {
            self.login_error = Some("Enter your email and password".to_string());
            return;
        }

        self.loading = true;
        match self.session.login(&email, &self.login_password).await {
            Ok(login) => {
                self.config.last_email = Some(email.clone());
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
                if let Err(e) = CredentialStore::store(&email, &self.login_password) {
                    // Keychain may be unavailable (headless session); login still succeeds
                    debug!(error = %e, "Keychain unavailable, not remembering password");
                }
                self.login_error = None;
                self.login_password.clear();
                self.state = AppState::Normal;
                self.user = Some(login.user);
                self.load_dashboard().await;
            }
            Err(err) => {
                self.login_error = Some(login_error_message(&err));
            }
        }
        self.loading = false;
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.user = None;
        self.requests.clear();
        self.users.clear();
        self.stats = DashboardStats::default();
        self.start_login();
    }

    // ===== Dashboard data =====

    /// Fetch everything the current role's dashboard shows and
    /// recompute the counters from the result.
    pub async fn load_dashboard(&mut self) {
        let Some(user) = self.session.user() else {
            self.start_login();
            return;
        };

        self.loading = true;
        self.error_message = None;
        self.role = user.role;

        let outcome = if self.role == Role::Admin {
            // Admins also see the account roster; fetch both at once
            let user_filter = UserFilter::default();
            match futures::try_join!(
                self.role.fetch_requests(&self.client, &user),
                self.client.users(&user_filter),
            ) {
                Ok((requests, users)) => {
                    self.users = users;
                    Ok(requests)
                }
                Err(err) => Err(err),
            }
        } else {
            self.role.fetch_requests(&self.client, &user).await
        };

        match outcome {
            Ok(requests) => {
                debug!(count = requests.len(), role = %self.role, "Dashboard loaded");
                self.requests = requests;
                self.recompute_stats();
                self.clamp_selections();
                self.user = Some(user);
            }
            Err(err) => self.handle_api_error(err),
        }
        self.loading = false;
    }

    pub async fn refresh(&mut self) {
        self.load_dashboard().await;
        if self.error_message.is_none() {
            self.status_message = Some("Refreshed".to_string());
        }
    }

    fn recompute_stats(&mut self) {
        self.stats = DashboardStats::from_requests(&self.requests);
    }

    fn clamp_selections(&mut self) {
        self.request_selection = self
            .request_selection
            .min(self.requests.len().saturating_sub(1));
        self.user_selection = self.user_selection.min(self.users.len().saturating_sub(1));
    }

    // ===== Status transitions =====

    pub fn selected_request(&self) -> Option<&MaintenanceRequest> {
        self.requests.get(self.request_selection)
    }

    /// Run a transition on the selected request. The follow-up state
    /// update is sequenced after the mutation completes: the updated
    /// resource replaces the local copy and the counters recompute,
    /// without a full reload.
    pub async fn transition_selected(&mut self, action: StatusAction) {
        if !self.role.can_transition() {
            return;
        }
        let Some(request) = self.selected_request() else {
            return;
        };
        if !action.offered_for(request.current_status()) {
            self.status_message = Some(format!("Cannot {} this request", action.label()));
            return;
        }

        let request_id = request.issue_id;
        self.loading = true;
        let result = match action {
            StatusAction::InProgress => self.client.mark_request_in_progress(request_id).await,
            StatusAction::UnderReview => self.client.mark_request_under_review(request_id).await,
            StatusAction::Complete => self.client.mark_request_complete(request_id).await,
            StatusAction::Reopen => self.client.reopen_request(request_id).await,
        };
        self.loading = false;

        match result {
            Ok(updated) => {
                self.status_message =
                    Some(format!("Request #{} is now {}", updated.issue_id, updated.status_name()));
                self.apply_updated_request(updated);
            }
            Err(err) => self.handle_api_error(err),
        }
    }

    fn apply_updated_request(&mut self, updated: MaintenanceRequest) {
        if let Some(slot) = self
            .requests
            .iter_mut()
            .find(|r| r.issue_id == updated.issue_id)
        {
            *slot = updated;
        } else {
            self.requests.push(updated);
        }
        self.recompute_stats();
    }

    // ===== New-request form =====

    pub fn start_new_request(&mut self) {
        self.form_description.clear();
        self.form_availability.clear();
        self.form_category = 0;
        self.form_focus = FormFocus::Description;
        self.state = AppState::NewRequest;
    }

    pub fn cycle_form_category(&mut self) {
        self.form_category = (self.form_category + 1) % CATEGORY_CHOICES.len();
    }

    pub async fn submit_new_request(&mut self) {
        let Some(ref user) = self.user else {
            return;
        };
        let (Some(student_id), Some(room_id)) = (user.student_id, user.room_id) else {
            self.error_message = Some(
                "Your account has no student record; contact an administrator.".to_string(),
            );
            self.state = AppState::Normal;
            return;
        };
        let description = self.form_description.trim().to_string();
        if description.is_empty() {
            self.error_message = Some("Describe the issue before submitting".to_string());
            return;
        }

        let availability = self.form_availability.trim();
        let payload = NewMaintenanceRequest {
            student_id,
            room_id,
            category_id: CATEGORY_CHOICES[self.form_category].0,
            description,
            availability: (!availability.is_empty()).then(|| availability.to_string()),
            estimated_cost: None,
        };

        self.loading = true;
        match self.client.create_maintenance_request(&payload).await {
            Ok(created) => {
                self.status_message = Some(format!("Request #{} submitted", created.issue_id));
                self.requests.insert(0, created);
                self.request_selection = 0;
                self.recompute_stats();
                self.state = AppState::Normal;
            }
            Err(err) => self.handle_api_error(err),
        }
        self.loading = false;
    }

    // ===== Navigation =====

    pub fn tabs(&self) -> &'static [Tab] {
        tabs_for(self.role)
    }

    pub fn next_tab(&mut self) {
        let tabs = self.tabs();
        let pos = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        self.current_tab = tabs[(pos + 1) % tabs.len()];
    }

    pub fn prev_tab(&mut self) {
        let tabs = self.tabs();
        let pos = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        self.current_tab = tabs[(pos + tabs.len() - 1) % tabs.len()];
    }

    pub fn select_tab(&mut self, index: usize) {
        if let Some(tab) = self.tabs().get(index) {
            self.current_tab = *tab;
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let (selection, len) = match self.current_tab {
            Tab::Users => (&mut self.user_selection, self.users.len()),
            _ => (&mut self.request_selection, self.requests.len()),
        };
        if len == 0 {
            return;
        }
        let current = *selection as isize;
        *selection = current.saturating_add(delta).clamp(0, len as isize - 1) as usize;
    }

    // ===== Errors =====

    /// Uniform failure handling: session expiry forces the login
    /// screen (the session itself was already cleared by the client);
    /// everything else becomes a dismissible error line with a manual
    /// retry.
    fn handle_api_error(&mut self, err: ApiError) {
        warn!(error = %err, "API call failed");
        match err {
            ApiError::SessionExpired => {
                self.start_login();
                self.login_error = Some(err.to_string());
            }
            other => {
                self.error_message = Some(if other.is_connectivity() {
                    format!("{}. Press [r] to retry.", other)
                } else {
                    other.to_string()
                });
            }
        }
    }

    pub fn dismiss_messages(&mut self) {
        self.status_message = None;
        self.error_message = None;
    }
}

fn login_error_message(err: &ApiError) -> String {
    if err.is_connectivity() {
        "Cannot reach the server. Check your connection and the API URL.".to_string()
    } else {
        err.to_string()
    }
}

// Input length guards used by the input handler

pub fn can_add_email_char(email: &str) -> bool {
    email.len() < MAX_EMAIL_LENGTH
}

pub fn can_add_password_char(password: &str) -> bool {
    password.len() < MAX_PASSWORD_LENGTH
}

pub fn can_add_description_char(description: &str) -> bool {
    description.len() < MAX_DESCRIPTION_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_gating_follows_lifecycle() {
        for action in [
            StatusAction::InProgress,
            StatusAction::UnderReview,
            StatusAction::Complete,
        ] {
            assert!(action.offered_for(Some(RequestStatus::Pending)));
            assert!(action.offered_for(Some(RequestStatus::InProgress)));
            assert!(!action.offered_for(Some(RequestStatus::Completed)));
        }
        assert!(StatusAction::Reopen.offered_for(Some(RequestStatus::Completed)));
        assert!(!StatusAction::Reopen.offered_for(Some(RequestStatus::Pending)));
    }

    #[test]
    fn test_unknown_status_treated_as_active() {
        // A status id outside the table must not strand the request
        // with no actions at all.
        assert!(StatusAction::Complete.offered_for(None));
        assert!(!StatusAction::Reopen.offered_for(None));
    }

    #[test]
    fn test_tab_sets_by_role() {
        assert_eq!(tabs_for(Role::Admin).len(), 3);
        assert!(tabs_for(Role::Admin).contains(&Tab::Users));
        for role in [Role::Student, Role::Officer, Role::HallOfficer] {
            assert!(!tabs_for(role).contains(&Tab::Users));
        }
    }

    #[test]
    fn test_students_never_transition() {
        assert!(!Role::Student.can_transition());
        assert!(Role::Officer.can_transition());
        assert!(Role::HallOfficer.can_transition());
        assert!(Role::Admin.can_transition());
    }

    #[test]
    fn test_input_length_guards() {
        assert!(can_add_email_char("user@example.com"));
        assert!(!can_add_email_char(&"x".repeat(MAX_EMAIL_LENGTH)));
        assert!(can_add_password_char("hunter2"));
        assert!(!can_add_description_char(&"x".repeat(MAX_DESCRIPTION_LENGTH)));
    }
}
