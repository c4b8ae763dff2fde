//! Unified client error handling for jobboard.
//!
//! Every failure a screen can hit is one of the [`ClientError`] kinds below.
//! The kind is decided once, inside the API client, so callers branch on the
//! variant instead of comparing raw HTTP status numbers.

use serde::Deserialize;
use thiserror::Error;

use crate::session::StorageError;

/// Error kinds surfaced by the client library
#[derive(Debug, Error)]
pub enum ClientError {
    /// Local form validation failed; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// The server answered with a non-success status.
    #[error("request failed with status {status}{}", suffix(.message))]
    Request {
        status: u16,
        message: Option<String>,
    },

    /// No response was received (connection refused, DNS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Local session storage is unavailable.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// An authenticated call was attempted without a stored token.
    #[error("no session token found")]
    NotAuthenticated,

    /// The server answered 2xx but the body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// Build a request error from a status and an optional JSON error body
    pub fn from_response(status: u16, body: Option<&serde_json::Value>) -> Self {
        let message = body
            .and_then(|b| serde_json::from_value::<ErrorBody>(b.clone()).ok())
            .and_then(|b| b.message.or(b.error));
        ClientError::Request { status, message }
    }

    /// HTTP status, for request errors only
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-supplied message, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Request { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// True when the user can fix the problem by changing their input.
    ///
    /// Covers local validation failures and 4xx responses.
    pub fn is_client_error(&self) -> bool {
        match self {
            ClientError::Validation(_) => true,
            ClientError::Request { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// Short message suitable for a notification
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Request { message, .. } if self.is_client_error() => message
                .clone()
                .unwrap_or_else(|| "Please check your input and try again!".to_string()),
            ClientError::NotAuthenticated => "No Token found! Please log in again.".to_string(),
            ClientError::Storage(_) => "Unable to access local session storage!".to_string(),
            _ => "Unable to reach the server, please try again later!".to_string(),
        }
    }
}

fn suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default()
}

/// Error envelope returned by the backend on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}
