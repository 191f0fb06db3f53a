use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("Session expired. Please login again.")]
    SessionExpired,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Server(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Error body shape the backend uses: FastAPI puts messages under
/// `detail`, a few handlers under `message`.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    message: Option<String>,
}

impl ApiError {
    /// Best-effort human-readable message from a JSON error body.
    fn extract_message(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed.detail.or(parsed.message).filter(|m| !m.is_empty())
    }

    /// Map a non-success response to a typed error, carrying the best
    /// available message from the body with a generic fallback.
    ///
    /// 401 is intentionally absent here: the gateway client handles it
    /// before body parsing (forced logout), and the login path maps it
    /// to `InvalidCredentials` itself.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::extract_message(body)
            .unwrap_or_else(|| format!("HTTP error: {}", status.as_u16()));
        match status.as_u16() {
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            422 => ApiError::Validation(message),
            _ => ApiError::Server(message),
        }
    }

    /// True when the request never reached the server, so the fix is
    /// connectivity rather than credentials or input.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_message_extracted_from_detail_field() {
        let err = ApiError::from_status(
            StatusCode::NOT_FOUND,
            r#"{"detail": "Maintenance request not found"}"#,
        );
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Maintenance request not found"));
    }

    #[test]
    fn test_message_extracted_from_message_field() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"message": "Invalid status_id"}"#);
        assert!(matches!(err, ApiError::Server(ref m) if m == "Invalid status_id"));
    }

    #[test]
    fn test_unparseable_body_falls_back_to_generic_message() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert!(matches!(err, ApiError::Server(ref m) if m == "HTTP error: 500"));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "{}"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "{}"),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "{}"),
            ApiError::Server(_)
        ));
    }

    #[test]
    fn test_session_expired_message() {
        assert_eq!(
            ApiError::SessionExpired.to_string(),
            "Session expired. Please login again."
        );
    }
}
