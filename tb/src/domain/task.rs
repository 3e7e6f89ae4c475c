//! Task records and the payloads sent to the task service

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Maximum title length accepted by the task service
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum description length accepted by the task service
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Server-assigned task identifier
///
/// The service hands out integers today, but the client treats the id as
/// opaque and round-trips whatever JSON form it received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(u64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Number(n) => write!(f, "{}", n),
            TaskId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for TaskId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(n) => TaskId::Number(n),
            Err(_) => TaskId::Text(s.to_string()),
        })
    }
}

impl From<u64> for TaskId {
    fn from(n: u64) -> Self {
        TaskId::Number(n)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Text(s.to_string())
    }
}

/// A task as acknowledged by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
}

impl NewTask {
    /// Build a draft the way the entry form does: trim the title and drop a
    /// blank description.
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        let title = title.into().trim().to_string();
        let description = description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());
        Self {
            title,
            description,
            completed: false,
        }
    }

    /// Local pre-check before submitting. The service stays authoritative.
    pub fn validate(&self) -> Result<(), DraftError> {
        debug!(title_len = self.title.chars().count(), "NewTask::validate: called");
        check_title(&self.title)?;
        check_description(self.description.as_deref())
    }
}

/// Partial update body; only `Some` fields are sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `Some(None)` clears the description on the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        if let Some(description) = &self.description {
            check_description(description.as_deref())?;
        }
        Ok(())
    }
}

/// Reasons a draft is rejected before it reaches the service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Task title is required")]
    TitleRequired,

    #[error("Title must be 200 characters or less")]
    TitleTooLong,

    #[error("Description must be 1000 characters or less")]
    DescriptionTooLong,
}

fn check_title(title: &str) -> Result<(), DraftError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DraftError::TitleRequired);
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(DraftError::TitleTooLong);
    }
    Ok(())
}

fn check_description(description: Option<&str>) -> Result<(), DraftError> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(DraftError::DescriptionTooLong),
        _ => Ok(()),
    }
}
