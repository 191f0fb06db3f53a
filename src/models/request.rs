//! Maintenance requests and their status lifecycle.

// Allow dead code: mirrored records keep fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// Status id and display-name bindings, as seeded by the backend.
/// This table is the only place the numeric ids appear; everything else
/// goes through [`RequestStatus`].
const STATUS_BINDINGS: [(RequestStatus, i64, &str); 4] = [
    (RequestStatus::Pending, 1, "Pending"),
    (RequestStatus::InProgress, 2, "In Progress"),
    (RequestStatus::UnderReview, 3, "Under Review"),
    (RequestStatus::Completed, 4, "Completed"),
];

/// Category choices offered on the new-request form, matching the
/// backend's seeded category table.
pub const CATEGORY_CHOICES: &[(i64, &str)] = &[
    (1, "Plumbing"),
    (2, "Electrical"),
    (3, "Furniture"),
    (4, "Cleaning"),
    (5, "Other"),
];

/// The request lifecycle as the backend enforces it.
///
/// Requests start Pending and move forward through In Progress and
/// Under Review to Completed; reopen returns a Completed request to
/// Pending. The legality of any given transition is decided
/// server-side; the client only uses this enum to pick which actions
/// to offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    InProgress,
    UnderReview,
    Completed,
}

impl RequestStatus {
    pub fn all() -> [RequestStatus; 4] {
        [
            RequestStatus::Pending,
            RequestStatus::InProgress,
            RequestStatus::UnderReview,
            RequestStatus::Completed,
        ]
    }

    /// Numeric id as used in paths and `status_ID` fields.
    pub fn id(&self) -> i64 {
        STATUS_BINDINGS
            .iter()
            .find(|(status, _, _)| status == self)
            .map(|(_, id, _)| *id)
            .unwrap_or(1)
    }

    pub fn name(&self) -> &'static str {
        STATUS_BINDINGS
            .iter()
            .find(|(status, _, _)| status == self)
            .map(|(_, _, name)| *name)
            .unwrap_or("Pending")
    }

    pub fn from_id(id: i64) -> Option<Self> {
        STATUS_BINDINGS
            .iter()
            .find(|(_, bound_id, _)| *bound_id == id)
            .map(|(status, _, _)| *status)
    }

    /// Everything short of Completed counts as active.
    pub fn is_active(&self) -> bool {
        !matches!(self, RequestStatus::Completed)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Denormalized status row the backend nests into requests for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusInfo {
    #[serde(rename = "status_ID")]
    pub status_id: i64,
    pub status_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInfo {
    #[serde(rename = "category_ID")]
    pub category_id: i64,
    pub category_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HallInfo {
    #[serde(rename = "hall_ID", default)]
    pub hall_id: Option<i64>,
    #[serde(default)]
    pub hall_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomInfo {
    #[serde(rename = "room_ID")]
    pub room_id: i64,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub hall: Option<HallInfo>,
}

/// Trimmed student record nested into requests; the full account lives
/// behind the users endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentInfo {
    #[serde(rename = "student_ID")]
    pub student_id: i64,
    #[serde(default)]
    pub student_number: Option<String>,
    #[serde(default)]
    pub user: Option<super::User>,
}

/// A maintenance request as mirrored from the backend. The server owns
/// the authoritative copy; this struct only ever holds what the last
/// fetch returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    #[serde(rename = "issue_ID")]
    pub issue_id: i64,
    #[serde(rename = "student_ID")]
    pub student_id: i64,
    #[serde(rename = "room_ID")]
    pub room_id: i64,
    #[serde(rename = "category_ID")]
    pub category_id: i64,
    #[serde(rename = "status_ID")]
    pub status_id: i64,
    pub description: String,
    #[serde(default)]
    pub availability: Option<String>,
    pub submission_timestamp: String,
    pub last_updated: String,
    #[serde(default)]
    pub completion_timestamp: Option<String>,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
    #[serde(default)]
    pub actual_cost: Option<f64>,
    // Denormalized rows the backend joins in for display
    #[serde(default)]
    pub student: Option<StudentInfo>,
    #[serde(default)]
    pub room: Option<RoomInfo>,
    #[serde(default)]
    pub category: Option<CategoryInfo>,
    #[serde(default)]
    pub status: Option<StatusInfo>,
}

impl MaintenanceRequest {
    /// Lifecycle status derived from the id binding; None if the
    /// backend ever sends an id outside the known table.
    pub fn current_status(&self) -> Option<RequestStatus> {
        RequestStatus::from_id(self.status_id)
    }

    pub fn is_active(&self) -> bool {
        self.current_status().map(|s| s.is_active()).unwrap_or(true)
    }

    /// Display name, preferring the backend's denormalized row.
    pub fn status_name(&self) -> &str {
        if let Some(ref status) = self.status {
            return &status.status_name;
        }
        self.current_status()
            .map(|s| s.name())
            .unwrap_or("Pending")
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.category_name.as_str())
    }

    pub fn hall_name(&self) -> Option<&str> {
        self.room
            .as_ref()
            .and_then(|r| r.hall.as_ref())
            .and_then(|h| h.hall_name.as_deref())
    }

    pub fn room_number(&self) -> Option<&str> {
        self.room.as_ref().and_then(|r| r.room_number.as_deref())
    }

    pub fn student_name(&self) -> Option<&str> {
        self.student
            .as_ref()
            .and_then(|s| s.user.as_ref())
            .map(|u| u.name.as_str())
    }
}

/// Payload for a student's new-request submission.
#[derive(Debug, Clone, Serialize)]
pub struct NewMaintenanceRequest {
    #[serde(rename = "student_ID")]
    pub student_id: i64,
    #[serde(rename = "room_ID")]
    pub room_id: i64,
    #[serde(rename = "category_ID")]
    pub category_id: i64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
}

/// Partial update payload for PUT on a request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MaintenanceRequestUpdate {
    #[serde(rename = "category_ID", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(rename = "status_ID", skip_serializing_if = "Option::is_none")]
    pub status_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<f64>,
}

/// Query filter for the request list endpoint.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub student_id: Option<i64>,
    pub status_id: Option<i64>,
    pub category_id: Option<i64>,
    pub hall_id: Option<i64>,
}

impl RequestFilter {
    pub fn for_student(student_id: i64) -> Self {
        Self {
            student_id: Some(student_id),
            ..Self::default()
        }
    }

    pub fn for_hall(hall_id: i64) -> Self {
        Self {
            hall_id: Some(hall_id),
            ..Self::default()
        }
    }

    pub fn with_status(status: RequestStatus) -> Self {
        Self {
            status_id: Some(status.id()),
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
        if let Some(student_id) = self.student_id {
            query.push(("student_id", student_id.to_string()));
        }
        if let Some(status_id) = self.status_id {
            query.push(("status_id", status_id.to_string()));
        }
        if let Some(category_id) = self.category_id {
            query.push(("category_id", category_id.to_string()));
        }
        if let Some(hall_id) = self.hall_id {
            query.push(("hall_id", hall_id.to_string()));
        }
        query
    }

    /// Local mirror of the server-side filter, used for demo fixtures
    /// and for asserting filter round-trips in tests.
    pub fn matches(&self, request: &MaintenanceRequest) -> bool {
        if let Some(student_id) = self.student_id {
            if request.student_id != student_id {
                return false;
            }
        }
        if let Some(status_id) = self.status_id {
            if request.status_id != status_id {
                return false;
            }
        }
        if let Some(category_id) = self.category_id {
            if request.category_id != category_id {
                return false;
            }
        }
        if let Some(hall_id) = self.hall_id {
            let request_hall = request
                .room
                .as_ref()
                .and_then(|r| r.hall.as_ref())
                .and_then(|h| h.hall_id);
            if request_hall != Some(hall_id) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_id_bindings() {
        assert_eq!(RequestStatus::Pending.id(), 1);
        assert_eq!(RequestStatus::InProgress.id(), 2);
        assert_eq!(RequestStatus::UnderReview.id(), 3);
        assert_eq!(RequestStatus::Completed.id(), 4);
        for status in RequestStatus::all() {
            assert_eq!(RequestStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(RequestStatus::from_id(9), None);
    }

    #[test]
    fn test_only_completed_is_inactive() {
        assert!(RequestStatus::Pending.is_active());
        assert!(RequestStatus::InProgress.is_active());
        assert!(RequestStatus::UnderReview.is_active());
        assert!(!RequestStatus::Completed.is_active());
    }

    #[test]
    fn test_parse_request_with_nested_rows() {
        let json = r#"{
            "issue_ID": 42,
            "student_ID": 3,
            "room_ID": 12,
            "category_ID": 1,
            "status_ID": 2,
            "description": "Leaking tap in the bathroom",
            "availability": "Weekday mornings",
            "submission_timestamp": "2026-05-12T09:30:00",
            "last_updated": "2026-05-13T14:00:00",
            "estimated_cost": 45.5,
            "category": {"category_ID": 1, "category_name": "Plumbing"},
            "status": {"status_ID": 2, "status_name": "In Progress"},
            "room": {
                "room_ID": 12,
                "room_number": "A-104",
                "hall": {"hall_ID": 2, "hall_name": "Peter Hall", "location": "North Wing"}
            }
        }"#;
        let request: MaintenanceRequest =
            serde_json::from_str(json).expect("Failed to parse request");
        assert_eq!(request.issue_id, 42);
        assert_eq!(request.current_status(), Some(RequestStatus::InProgress));
        assert_eq!(request.status_name(), "In Progress");
        assert_eq!(request.category_name(), Some("Plumbing"));
        assert_eq!(request.hall_name(), Some("Peter Hall"));
        assert!(request.is_active());
        assert!(request.completion_timestamp.is_none());
    }

    #[test]
    fn test_parse_request_without_nested_rows() {
        // Some list endpoints omit the joined rows; names fall back to the binding table
        let json = r#"{
            "issue_ID": 7,
            "student_ID": 1,
            "room_ID": 4,
            "category_ID": 2,
            "status_ID": 4,
            "description": "Broken socket",
            "submission_timestamp": "2026-04-01T10:00:00",
            "last_updated": "2026-04-03T16:20:00",
            "completion_timestamp": "2026-04-03T16:20:00"
        }"#;
        let request: MaintenanceRequest =
            serde_json::from_str(json).expect("Failed to parse request");
        assert_eq!(request.status_name(), "Completed");
        assert!(!request.is_active());
    }

    #[test]
    fn test_filter_query_parameters() {
        let filter = RequestFilter {
            skip: Some(0),
            limit: Some(25),
            student_id: Some(3),
            status_id: Some(1),
            category_id: None,
            hall_id: Some(2),
        };
        let query = filter.to_query();
        assert!(query.contains(&("student_id", "3".to_string())));
        assert!(query.contains(&("status_id", "1".to_string())));
        assert!(query.contains(&("hall_id", "2".to_string())));
        assert!(!query.iter().any(|(k, _)| *k == "category_id"));
    }

    #[test]
    fn test_status_filter_round_trip() {
        let mut request: MaintenanceRequest = serde_json::from_str(
            r#"{
                "issue_ID": 1, "student_ID": 1, "room_ID": 1, "category_ID": 1,
                "status_ID": 1, "description": "x",
                "submission_timestamp": "2026-01-01T00:00:00",
                "last_updated": "2026-01-01T00:00:00"
            }"#,
        )
        .unwrap();

        let pending = RequestFilter::with_status(RequestStatus::Pending);
        let completed = RequestFilter::with_status(RequestStatus::Completed);

        // A freshly created request shows up pending, not completed
        assert!(pending.matches(&request));
        assert!(!completed.matches(&request));

        // ...until its status is transitioned
        request.status_id = RequestStatus::Completed.id();
        assert!(!pending.matches(&request));
        assert!(completed.matches(&request));
    }
}
