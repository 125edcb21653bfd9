// src/error.rs
//! Error taxonomy shared by the HTTP client, services and stores.
//!
//! Every failure reduces to one human-readable string: the `Display` output of
//! [`ApiError`]. Stores keep that string in their `error` field.

use thiserror::Error;

pub const NO_RESPONSE_MESSAGE: &str = "No response from server. Please check your connection.";
pub const REQUEST_FAILED_MESSAGE: &str = "Failed to make request";
pub const SERVER_FALLBACK_MESSAGE: &str = "An error occurred";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred";
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure reported by an [`HttpTransport`](crate::core::HttpTransport)
/// before any response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request went out but nothing came back (connect error, timeout).
    #[error("no response received: {0}")]
    NoResponse(String),
    /// The request could not be built.
    #[error("request setup failed: {0}")]
    Setup(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{}", NO_RESPONSE_MESSAGE)]
    Network { detail: String },

    #[error("{message}")]
    Request { message: String },

    #[error("{message}")]
    Server { status: u16, message: String },

    /// Token expired locally; the request was never sent.
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    SessionExpired,

    #[error("{}", UNEXPECTED_MESSAGE)]
    Decode { detail: String },

    #[error("{0}")]
    InvalidInput(String),
}

impl ApiError {
    /// Build the error for a non-success response.
    ///
    /// Prefers the server's JSON `message` field, then the HTTP status text,
    /// then a generic message.
    pub fn from_response(status: u16, status_text: &str, body: &str) -> Self {
        let server_message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .filter(|m| !m.trim().is_empty());

        let message = server_message
            .or_else(|| Some(status_text.to_string()).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| SERVER_FALLBACK_MESSAGE.to_string());

        ApiError::Server { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }

    /// The message the server sent back, if this error came from a response.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Server message when there is one, otherwise `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NoResponse(detail) => ApiError::Network { detail },
            TransportError::Setup(message) if message.trim().is_empty() => ApiError::Request {
                message: REQUEST_FAILED_MESSAGE.to_string(),
            },
            TransportError::Setup(message) => ApiError::Request { message },
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode {
            detail: err.to_string(),
        }
    }
}
