//! Fixture data for demo mode.
//!
//! The original deployment scattered hardcoded sample data across its
//! views as a fallback when calls failed. Here that is one explicit
//! capability: when the gateway client is built `with_demo_data`, each
//! endpoint serves the fixtures below through the same typed surface,
//! filtered with the same semantics the backend applies.

use chrono::Utc;

use crate::api::ApiError;
use crate::models::{
    CategoryInfo, HallAssignment, HallInfo, MaintenanceRequest, NewMaintenanceRequest,
    RequestFilter, RequestStatus, Role, RoomInfo, StatusInfo, StudentInfo, User, UserFilter,
    CATEGORY_CHOICES,
};

/// Issue ids for requests created during a demo session start here,
/// above every seeded fixture.
const CREATED_ID_BASE: i64 = 100;

fn timestamp_now() -> String {
    // The backend serializes naive datetimes; match that shape.
    Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn status_info(status: RequestStatus) -> StatusInfo {
    StatusInfo {
        status_id: status.id(),
        status_name: status.name().to_string(),
        description: None,
    }
}

fn category_info(category_id: i64) -> Option<CategoryInfo> {
    CATEGORY_CHOICES
        .iter()
        .find(|(id, _)| *id == category_id)
        .map(|(id, name)| CategoryInfo {
            category_id: *id,
            category_name: name.to_string(),
            description: None,
        })
}

fn room(room_id: i64, room_number: &str, hall_id: i64, hall_name: &str) -> RoomInfo {
    RoomInfo {
        room_id,
        room_number: Some(room_number.to_string()),
        hall: Some(HallInfo {
            hall_id: Some(hall_id),
            hall_name: Some(hall_name.to_string()),
            location: None,
        }),
    }
}

fn demo_user(id: i64, name: &str, email: &str, role: Role) -> User {
    User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        role,
        phone_number: None,
        created_at: None,
        updated_at: None,
        student_id: None,
        room_id: None,
    }
}

/// The four demo accounts, one per role.
pub fn users() -> Vec<User> {
    let mut student = demo_user(1, "John Doe", "john.doe@stu.cu.edu.ng", Role::Student);
    student.student_id = Some(1);
    student.room_id = Some(12);
    vec![
        student,
        demo_user(2, "Maintenance Officer", "maintenance@cu.edu.ng", Role::Officer),
        demo_user(3, "Hall Officer", "hall.officer@cu.edu.ng", Role::HallOfficer),
        demo_user(4, "System Administrator", "admin@cu.edu.ng", Role::Admin),
    ]
}

pub fn filter_users(filter: &UserFilter) -> Vec<User> {
    users().into_iter().filter(|u| filter.matches(u)).collect()
}

pub fn user(user_id: i64) -> Result<User, ApiError> {
    users()
        .into_iter()
        .find(|u| u.id == user_id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// The demo hall officer (user 3) manages hall 2; nobody else has one.
pub fn hall_assignment(user_id: i64) -> HallAssignment {
    HallAssignment {
        hall_id: if user_id == 3 { Some(2) } else { None },
    }
}

fn fixture(
    issue_id: i64,
    category_id: i64,
    status: RequestStatus,
    description: &str,
    room_info: RoomInfo,
    submitted: &str,
    updated: &str,
) -> MaintenanceRequest {
    MaintenanceRequest {
        issue_id,
        student_id: 1,
        room_id: room_info.room_id,
        category_id,
        status_id: status.id(),
        description: description.to_string(),
        availability: None,
        submission_timestamp: submitted.to_string(),
        last_updated: updated.to_string(),
        completion_timestamp: if status == RequestStatus::Completed {
            Some(updated.to_string())
        } else {
            None
        },
        estimated_cost: None,
        actual_cost: None,
        student: Some(StudentInfo {
            student_id: 1,
            student_number: Some("CU/2024/0153".to_string()),
            user: users().into_iter().next(),
        }),
        room: Some(room_info),
        category: category_info(category_id),
        status: Some(status_info(status)),
    }
}

/// Seeded request fixtures covering every lifecycle state and both halls.
pub fn requests() -> Vec<MaintenanceRequest> {
    vec![
        fixture(
            1,
            1,
            RequestStatus::Pending,
            "Leaking tap in the bathroom",
            room(12, "A-104", 2, "Peter Hall"),
            "2026-07-28T09:30:00",
            "2026-07-28T09:30:00",
        ),
        fixture(
            2,
            2,
            RequestStatus::InProgress,
            "Socket near the desk sparks when used",
            room(12, "A-104", 2, "Peter Hall"),
            "2026-07-25T14:10:00",
            "2026-07-27T08:45:00",
        ),
        fixture(
            3,
            3,
            RequestStatus::UnderReview,
            "Wardrobe door hanging off its hinge",
            room(4, "B-210", 1, "Esther Hall"),
            "2026-07-20T11:00:00",
            "2026-07-29T16:30:00",
        ),
        fixture(
            4,
            4,
            RequestStatus::Completed,
            "Corridor light flickering at night",
            room(7, "C-015", 1, "Esther Hall"),
            "2026-07-10T19:20:00",
            "2026-07-14T10:05:00",
        ),
    ]
}

pub fn filter_requests(filter: &RequestFilter) -> Vec<MaintenanceRequest> {
    requests()
        .into_iter()
        .filter(|r| filter.matches(r))
        .collect()
}

pub fn active_requests() -> Vec<MaintenanceRequest> {
    requests().into_iter().filter(|r| r.is_active()).collect()
}

pub fn request(request_id: i64) -> Result<MaintenanceRequest, ApiError> {
    requests()
        .into_iter()
        .find(|r| r.issue_id == request_id)
        .ok_or_else(|| ApiError::NotFound("Maintenance request not found".to_string()))
}

/// What the backend would return for a fresh submission: the payload
/// echoed back with server-assigned id, Pending status, and timestamps.
pub fn created_request(new_request: &NewMaintenanceRequest) -> MaintenanceRequest {
    let now = timestamp_now();
    MaintenanceRequest {
        issue_id: CREATED_ID_BASE,
        student_id: new_request.student_id,
        room_id: new_request.room_id,
        category_id: new_request.category_id,
        status_id: RequestStatus::Pending.id(),
        description: new_request.description.clone(),
        availability: new_request.availability.clone(),
        submission_timestamp: now.clone(),
        last_updated: now,
        completion_timestamp: None,
        estimated_cost: new_request.estimated_cost,
        actual_cost: None,
        student: None,
        room: None,
        category: category_info(new_request.category_id),
        status: Some(status_info(RequestStatus::Pending)),
    }
}

/// Apply a status transition to a fixture, the way the backend would:
/// new status row, fresh last_updated, completion timestamp on
/// Completed and cleared again on reopen.
pub fn transition(request_id: i64, status: RequestStatus) -> Result<MaintenanceRequest, ApiError> {
    let mut updated = request(request_id)?;
    updated.status_id = status.id();
    updated.status = Some(status_info(status));
    updated.last_updated = timestamp_now();
    updated.completion_timestamp = if status == RequestStatus::Completed {
        Some(updated.last_updated.clone())
    } else {
        None
    };
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_cover_every_status() {
        let requests = requests();
        for status in RequestStatus::all() {
            assert!(
                requests.iter().any(|r| r.status_id == status.id()),
                "no fixture with status {}",
                status
            );
        }
    }

    #[test]
    fn test_one_user_per_role() {
        let users = users();
        for role in [Role::Student, Role::Officer, Role::HallOfficer, Role::Admin] {
            assert_eq!(users.iter().filter(|u| u.role == role).count(), 1);
        }
    }

    #[test]
    fn test_hall_filter_scopes_fixtures() {
        let hall_two = filter_requests(&RequestFilter::for_hall(2));
        assert!(!hall_two.is_empty());
        assert!(hall_two.iter().all(|r| r.hall_name() == Some("Peter Hall")));
    }

    #[test]
    fn test_active_excludes_completed() {
        assert!(active_requests().iter().all(|r| r.is_active()));
        assert!(active_requests().len() < requests().len());
    }

    #[test]
    fn test_reopen_clears_completion_timestamp() {
        let completed = request(4).unwrap();
        assert!(completed.completion_timestamp.is_some());

        let reopened = transition(4, RequestStatus::Pending).unwrap();
        assert_eq!(reopened.status_name(), "Pending");
        assert!(reopened.completion_timestamp.is_none());
    }
}
