//! Unified error handling for the storefront client.
//!
//! Every fallible operation in the crate funnels into [`ApiError`]. Transport
//! failures are classified at the reqwest boundary, non-2xx responses carry
//! the backend's `{"message": ...}` body when one is present, and local
//! validation failures never reach the network at all.

use serde::Deserialize;
use thiserror::Error;

/// Error body convention used by the backend for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Unified client error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Local input validation failed; no request was made
    #[error("{0}")]
    Validation(String),

    /// The server rejected the credentials (HTTP 401)
    #[error("Email or password is incorrect")]
    Authentication,

    /// The session lacks permission for this operation (HTTP 403)
    #[error("You do not have permission to perform this action")]
    Authorization,

    /// The account authenticated but carries no role assignment
    #[error("This account has no assigned role")]
    MissingRole,

    /// The backend reported a role outside the known set
    #[error("Unrecognized account role: {0}")]
    InvalidRole(String),

    /// The request never produced a response (DNS, connect, timeout)
    #[error("Could not reach the server: {0}")]
    Network(String),

    /// Any other non-2xx response, with the backend's message when present
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A response arrived but could not be interpreted
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    /// The durable session store could not be read or written
    #[error("Session storage error: {0}")]
    Session(#[from] std::io::Error),
}

impl ApiError {
    /// Local validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// Map a non-2xx status and its raw body into the matching variant,
    /// honoring the `{"message": ...}` body convention
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 => ApiError::Authentication,
            403 => ApiError::Authorization,
            _ => ApiError::Server {
                status,
                message: parse_error_message(body)
                    .unwrap_or_else(|| format!("HTTP {}", status)),
            },
        }
    }
}

/// Extract the backend's error message from a response body, if the body
/// follows the `{"message": "..."}` convention.
pub(crate) fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ApiError::Network(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Server {
                status: status.as_u16(),
                message: format!("HTTP {}", status.as_u16()),
            }
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_response(401, ""),
            ApiError::Authentication
        ));
        assert!(matches!(
            ApiError::from_response(403, "{\"message\":\"nope\"}"),
            ApiError::Authorization
        ));
        match ApiError::from_response(404, "") {
            ApiError::Server { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "HTTP 404");
            }
            other => panic!("Expected Server variant, got {:?}", other),
        }
    }

    #[test]
    fn test_error_body_message_used_when_present() {
        match ApiError::from_response(500, "{\"message\":\"stock must be positive\"}") {
            ApiError::Server { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "stock must be positive");
            }
            other => panic!("Expected Server variant, got {:?}", other),
        }
    }

    #[test]
    fn test_error_body_fallbacks() {
        assert_eq!(parse_error_message("not json at all"), None);
        assert_eq!(parse_error_message("{\"message\":\"\"}"), None);
        assert_eq!(parse_error_message("{\"message\":\"   \"}"), None);
        assert_eq!(parse_error_message("{\"other\":\"field\"}"), None);
        assert_eq!(
            parse_error_message("{\"message\":\"Invalid token\"}"),
            Some("Invalid token".to_string())
        );
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ApiError::Authentication.to_string(),
            "Email or password is incorrect"
        );
        assert_eq!(
            ApiError::MissingRole.to_string(),
            "This account has no assigned role"
        );
        assert_eq!(
            ApiError::InvalidRole("editor".to_string()).to_string(),
            "Unrecognized account role: editor"
        );
        assert_eq!(
            ApiError::validation("Name is required").to_string(),
            "Name is required"
        );
    }
}
