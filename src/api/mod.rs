//! REST API gateway module for the hostel management backend.
//!
//! `ApiClient` is the sole channel through which views read or mutate
//! backend-owned resources; `ApiError` is the typed failure taxonomy
//! every operation surfaces.

pub mod client;
pub mod error;

pub use client::{ApiClient, DeleteResponse};
pub use error::ApiError;
