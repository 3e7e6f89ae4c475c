//! User-visible notifications
//!
//! Failures are turned into toast-style messages here, separately from their
//! classification in [`crate::api::ApiError`]. Messages are delivered to
//! whoever is listening on the [`NotificationBus`].

mod bus;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, NotificationBus};

use crate::api::ApiError;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// One message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Messages shown for a failure: one per field/message pair for validation
/// errors, exactly one otherwise
pub fn messages_for(err: &ApiError) -> Vec<String> {
    match err {
        ApiError::NotFound => vec!["Task not found".to_string()],
        ApiError::Validation(fields) => fields
            .pairs()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect(),
        ApiError::InvalidRequest { .. } => vec!["Invalid request".to_string()],
        ApiError::Server { .. } => vec!["Server error. Please try again later.".to_string()],
        ApiError::Timeout(_) | ApiError::Network(_) => {
            vec!["Unable to connect to server. Please check your connection.".to_string()]
        }
        ApiError::Unexpected(_) => vec!["An unexpected error occurred".to_string()],
    }
}
