//! User-visible notifications.
//!
//! Every outcome a screen reports (success or failure) becomes one short
//! [`Notice`]. Errors are never written to a durable log; the notice and the
//! tracing output are the only traces.

use std::fmt;

use crate::api::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }

    pub fn from_error(err: &ClientError) -> Self {
        Self::error(err.user_message())
    }

    /// Prefer the server's own message; otherwise use `fallback`.
    /// A missing token keeps its dedicated wording.
    pub fn from_error_or(err: &ClientError, fallback: &str) -> Self {
        match err {
            ClientError::NotAuthenticated | ClientError::Validation(_) => Self::from_error(err),
            _ => Self::error(err.server_message().unwrap_or(fallback)),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Notice::success("Saved").to_string(), "Success: Saved");
        assert_eq!(Notice::error("Nope").to_string(), "Error: Nope");
    }

    #[test]
    fn test_from_error_or_prefers_server_message() {
        let err = ClientError::Request {
            status: 404,
            message: Some("Job not found".into()),
        };
        assert_eq!(Notice::from_error_or(&err, "fallback").message, "Job not found");

        let err = ClientError::Network("refused".into());
        let notice = Notice::from_error_or(&err, "Unable to show Job details!");
        assert!(notice.is_error());
        assert_eq!(notice.message, "Unable to show Job details!");
    }

    #[test]
    fn test_from_error_or_keeps_missing_token_message() {
        let notice = Notice::from_error_or(&ClientError::NotAuthenticated, "fallback");
        assert_eq!(notice.message, "No Token found! Please log in again.");
    }
}
