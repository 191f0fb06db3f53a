//! User accounts and the role variants that drive dashboard dispatch.

// Allow dead code: payload structs mirror the full backend contract
#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{ApiClient, ApiError};
use crate::models::{MaintenanceRequest, RequestFilter};

/// The closed set of account roles the backend issues.
///
/// Every place the original dashboard branched on a role string goes
/// through this enum instead, so the "which requests are mine" question
/// is answered in exactly one place ([`Role::fetch_requests`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Officer,
    HallOfficer,
    Admin,
}

impl Role {
    /// Wire name as the backend spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Officer => "officer",
            Role::HallOfficer => "hall_officer",
            Role::Admin => "admin",
        }
    }

    /// Parse a role name, failing with [`ApiError::UnknownRole`] on
    /// anything outside the known set.
    pub fn from_name(name: &str) -> Result<Self, ApiError> {
        match name {
            "student" => Ok(Role::Student),
            "officer" => Ok(Role::Officer),
            "hall_officer" => Ok(Role::HallOfficer),
            "admin" => Ok(Role::Admin),
            other => Err(ApiError::UnknownRole(other.to_string())),
        }
    }

    /// Lenient parse for places that must always produce a dashboard:
    /// an unrecognized role falls back to the least-privileged view.
    pub fn from_name_or_student(name: &str) -> Self {
        Role::from_name(name).unwrap_or_else(|e| {
            warn!(role = name, error = %e, "Falling back to student view");
            Role::Student
        })
    }

    /// Display title for the dashboard header.
    pub fn dashboard_title(&self) -> &'static str {
        match self {
            Role::Student => "Student Dashboard",
            Role::Officer => "Maintenance Officer Dashboard",
            Role::HallOfficer => "Hall Officer Dashboard",
            Role::Admin => "Admin Dashboard",
        }
    }

    /// Whether this role may transition request statuses.
    /// Students submit requests; they never move them through the lifecycle.
    pub fn can_transition(&self) -> bool {
        !matches!(self, Role::Student)
    }

    /// Fetch the requests relevant to this role, with the role-specific
    /// filtering baked in here rather than scattered across views.
    pub async fn fetch_requests(
        &self,
        client: &ApiClient,
        user: &User,
    ) -> Result<Vec<MaintenanceRequest>, ApiError> {
        match self {
            Role::Student => {
                // The backend scopes the list to the caller's student record;
                // the explicit filter keeps the request self-describing.
                let student_id = user.student_id.unwrap_or(user.id);
                client
                    .maintenance_requests(&RequestFilter::for_student(student_id))
                    .await
            }
            Role::Officer | Role::Admin => {
                client.maintenance_requests(&RequestFilter::default()).await
            }
            Role::HallOfficer => {
                let assignment = client.hall_officer_hall(user.id).await?;
                match assignment.hall_id {
                    Some(hall_id) => {
                        client
                            .maintenance_requests(&RequestFilter::for_hall(hall_id))
                            .await
                    }
                    None => {
                        warn!(user_id = user.id, "Hall officer has no hall assignment");
                        Ok(Vec::new())
                    }
                }
            }
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account as the backend returns it.
///
/// The login response carries a trimmed profile (no timestamps, no
/// student record), so everything beyond the identity core is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    // Student-only fields
    #[serde(rename = "student_ID", default)]
    pub student_id: Option<i64>,
    #[serde(rename = "room_ID", default)]
    pub room_id: Option<i64>,
}

/// Payload for creating a user account.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub password: String,
}

/// Partial update payload. The backend requires the password field on
/// updates even when nothing else changes.
#[derive(Debug, Clone, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub password: String,
}

/// Query filter for the user list endpoint.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub role: Option<Role>,
}

impl UserFilter {
    pub fn with_role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(skip) = self.skip {
            query.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(role) = self.role {
            query.push(("role", role.as_str().to_string()));
        }
        query
    }

    /// Local mirror of the server-side filter, used for demo fixtures.
    pub fn matches(&self, user: &User) -> bool {
        self.role.map(|r| user.role == r).unwrap_or(true)
    }
}

/// Response from `/users/{id}/hall`: the hall a hall officer is
/// assigned to, or null for everyone else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HallAssignment {
    pub hall_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Student, Role::Officer, Role::HallOfficer, Role::Admin] {
            assert_eq!(Role::from_name(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_an_error() {
        let err = Role::from_name("superuser").unwrap_err();
        assert!(matches!(err, ApiError::UnknownRole(ref r) if r == "superuser"));
    }

    #[test]
    fn test_unknown_role_falls_back_to_student() {
        assert_eq!(Role::from_name_or_student("manager"), Role::Student);
        assert_eq!(Role::from_name_or_student("admin"), Role::Admin);
    }

    #[test]
    fn test_parse_login_profile() {
        // Trimmed profile as the login endpoint returns it
        let json = r#"{"id":1,"name":"Jane","email":"student@demo.com","role":"student"}"#;
        let user: User = serde_json::from_str(json).expect("Failed to parse login profile");
        assert_eq!(user.role, Role::Student);
        assert!(user.student_id.is_none());
        assert!(user.created_at.is_none());
    }

    #[test]
    fn test_parse_full_user() {
        let json = r#"{
            "id": 7,
            "name": "John Doe",
            "email": "john.doe@stu.cu.edu.ng",
            "phone_number": "0801234567",
            "role": "student",
            "created_at": "2026-01-10T08:00:00",
            "updated_at": "2026-01-10T08:00:00",
            "student_ID": 3,
            "room_ID": 12
        }"#;
        let user: User = serde_json::from_str(json).expect("Failed to parse user");
        assert_eq!(user.student_id, Some(3));
        assert_eq!(user.room_id, Some(12));
    }

    #[test]
    fn test_parse_user_rejects_unknown_role() {
        let json = r#"{"id":1,"name":"X","email":"x@y.z","role":"warden"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }

    #[test]
    fn test_user_filter_query() {
        let filter = UserFilter {
            skip: Some(10),
            limit: Some(50),
            role: Some(Role::HallOfficer),
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("skip", "10".to_string()),
                ("limit", "50".to_string()),
                ("role", "hall_officer".to_string()),
            ]
        );
        assert!(UserFilter::default().to_query().is_empty());
    }
}
