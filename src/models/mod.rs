//! Data models mirrored from the hostel management backend.
//!
//! This module contains the typed record shapes the client exchanges
//! with the REST API:
//!
//! - `User`, `Role`: accounts and the role dispatch behind each dashboard
//! - `MaintenanceRequest`, `RequestStatus`: requests and their lifecycle
//! - `DashboardStats`: counters derived from the fetched request collection
//!
//! The backend owns the authoritative copies; these structs only ever
//! hold what the last fetch returned.

pub mod request;
pub mod stats;
pub mod user;

pub use request::{
    CategoryInfo, HallInfo, MaintenanceRequest, MaintenanceRequestUpdate, NewMaintenanceRequest,
    RequestFilter, RequestStatus, RoomInfo, StatusInfo, StudentInfo, CATEGORY_CHOICES,
};
pub use stats::DashboardStats;
pub use user::{HallAssignment, NewUser, Role, User, UserFilter, UserUpdate};
