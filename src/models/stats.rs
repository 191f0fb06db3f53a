//! Derived dashboard counters.

use crate::models::{MaintenanceRequest, RequestStatus};

/// The stat tiles at the top of every dashboard variant.
///
/// Always computed from the locally-fetched request collection; never
/// persisted, recomputed on every successful fetch and after every
/// successful status transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub pending: usize,
}

impl DashboardStats {
    pub fn from_requests(requests: &[MaintenanceRequest]) -> Self {
        Self {
            total: requests.len(),
            active: requests.iter().filter(|r| r.is_active()).count(),
            completed: requests
                .iter()
                .filter(|r| r.status_id == RequestStatus::Completed.id())
                .count(),
            pending: requests
                .iter()
                .filter(|r| r.status_id == RequestStatus::Pending.id())
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_status(issue_id: i64, status: RequestStatus) -> MaintenanceRequest {
        serde_json::from_str(&format!(
            r#"{{
                "issue_ID": {issue_id}, "student_ID": 1, "room_ID": 1, "category_ID": 1,
                "status_ID": {}, "description": "x",
                "submission_timestamp": "2026-01-01T00:00:00",
                "last_updated": "2026-01-01T00:00:00"
            }}"#,
            status.id()
        ))
        .unwrap()
    }

    #[test]
    fn test_stats_from_requests() {
        let requests = vec![
            request_with_status(1, RequestStatus::Pending),
            request_with_status(2, RequestStatus::InProgress),
            request_with_status(3, RequestStatus::UnderReview),
            request_with_status(4, RequestStatus::Completed),
        ];
        let stats = DashboardStats::from_requests(&requests);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 1);
    }

    #[test]
    fn test_completing_a_request_moves_it_between_counters() {
        let mut requests = vec![
            request_with_status(1, RequestStatus::InProgress),
            request_with_status(2, RequestStatus::Pending),
        ];
        let before = DashboardStats::from_requests(&requests);

        // Simulate a successful complete transition applied locally
        requests[0].status_id = RequestStatus::Completed.id();
        let after = DashboardStats::from_requests(&requests);

        assert_eq!(after.completed, before.completed + 1);
        assert_eq!(after.active, before.active - 1);
        assert_eq!(after.total, before.total);
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(DashboardStats::from_requests(&[]), DashboardStats::default());
    }
}
