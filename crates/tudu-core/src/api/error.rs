//! Typed errors for API operations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display message for transport-level failures.
const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Display message when a stored token is rejected with HTTP 401.
const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Categories of API errors for consistent error handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// Transport failure (connect, timeout, malformed response body)
    Network,
    /// Client-side precondition rejected the request before it was sent
    Validation,
    /// HTTP 401 on an authenticated request (stored token no longer valid)
    Unauthorized,
    /// Any other non-success response from the server
    Server,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Validation => write!(f, "validation"),
            ApiErrorKind::Unauthorized => write!(f, "unauthorized"),
            ApiErrorKind::Server => write!(f, "server"),
        }
    }
}

/// Structured error from the API client with kind and details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates a transport-failure error with a fixed display message.
    pub fn network(details: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: NETWORK_ERROR_MESSAGE.to_string(),
            details: Some(details.into()),
        }
    }

    /// Creates a client-side validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    /// Creates a session-expired error (HTTP 401 on an authenticated request).
    pub fn unauthorized() -> Self {
        Self::new(ApiErrorKind::Unauthorized, SESSION_EXPIRED_MESSAGE)
    }

    /// Creates a server-rejection error, keeping the raw body as details.
    pub fn server(message: impl Into<String>, body: &str) -> Self {
        Self {
            kind: ApiErrorKind::Server,
            message: message.into(),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
