//! Task service error taxonomy
//!
//! Every failure at the network boundary is classified into exactly one
//! [`ApiError`] variant. Classification is pure; reporting the failure to
//! the user is done separately by [`crate::notify::NotificationBus::report`].

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Errors returned by [`super::TaskApi`] calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Task not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Invalid request (status {status})")]
    InvalidRequest { status: u16 },

    #[error("Server error {status}")]
    Server { status: u16 },

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Coarse classification used by callers that only care about the class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Validation,
    InvalidRequest,
    Server,
    Network,
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::NotFound => "not-found",
            ErrorKind::Validation => "validation",
            ErrorKind::InvalidRequest => "invalid-request",
            ErrorKind::Server => "server",
            ErrorKind::Network => "network",
            ErrorKind::Unexpected => "unexpected",
        };
        write!(f, "{}", s)
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound => ErrorKind::NotFound,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Timeout(_) | ApiError::Network(_) => ErrorKind::Network,
            ApiError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Classify a non-success response from its status and raw body
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        debug!(status, body_len = body.len(), "ApiError::from_status: called");
        match status {
            404 => ApiError::NotFound,
            400..=499 => match serde_json::from_slice::<Value>(body).ok().and_then(|v| FieldErrors::from_value(&v)) {
                Some(fields) => {
                    debug!(field_count = fields.len(), "ApiError::from_status: structured field errors");
                    ApiError::Validation(fields)
                }
                None => {
                    debug!("ApiError::from_status: unstructured client error");
                    ApiError::InvalidRequest { status }
                }
            },
            500.. => ApiError::Server { status },
            _ => ApiError::Unexpected(format!("unexpected status {}", status)),
        }
    }

    /// Classify a failure that produced no usable response
    pub fn from_transport(err: &reqwest::Error, timeout: Duration) -> Self {
        debug!(error = %err, "ApiError::from_transport: called");
        if err.is_timeout() {
            ApiError::Timeout(timeout)
        } else if err.is_builder() || err.is_decode() {
            ApiError::Unexpected(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Per-field validation messages from a 4xx response body
///
/// Fields are kept in name order; each field has at least one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(String, Vec<String>)>);

impl FieldErrors {
    pub fn new(fields: Vec<(String, Vec<String>)>) -> Self {
        Self(fields)
    }

    /// Parse a `{field: [messages]}` object. Single values are treated as a
    /// one-message list and fields with an empty list are dropped. Returns
    /// `None` unless at least one message remains.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let mut fields: Vec<(String, Vec<String>)> = map
            .iter()
            .map(|(field, messages)| {
                let messages: Vec<String> = match messages {
                    Value::Array(items) => items.iter().map(message_text).collect(),
                    other => vec![message_text(other)],
                };
                (field.clone(), messages)
            })
            .filter(|(_, messages)| !messages.is_empty())
            .collect();
        if fields.is_empty() {
            return None;
        }
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        Some(Self(fields))
    }

    /// Every `(field, message)` pair, one per message
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| (field.as_str(), m.as_str())))
    }

    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.0.iter().find(|(f, _)| f == field).map(|(_, m)| m.as_slice())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.pairs().map(|(field, msg)| format!("{}: {}", field, msg)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
