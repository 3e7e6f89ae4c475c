//! Observable store state and store errors

use thiserror::Error;

use crate::api::ApiError;
use crate::domain::{Filter, FilterCounts, Task, TaskId, project};

/// Snapshot of everything the store holds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskState {
    /// Local mirror of the service collection, newest first after creates
    pub tasks: Vec<Task>,
    /// A list fetch is in flight
    pub loading: bool,
    /// Message of the last failed list fetch, cleared by the next success
    pub error: Option<String>,
    pub filter: Filter,
}

impl TaskState {
    /// Tasks visible under the active filter
    pub fn visible(&self) -> Vec<&Task> {
        project(&self.tasks, self.filter)
    }

    pub fn counts(&self) -> FilterCounts {
        FilterCounts::of(&self.tasks)
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }
}

/// Errors from store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The service call failed; it has already been reported to the user
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The handle was closed before the response could be applied
    #[error("Request cancelled: store handle closed")]
    Cancelled,
}

impl StoreError {
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            StoreError::Api(err) => Some(err),
            StoreError::Cancelled => None,
        }
    }
}

/// Response from store operations
pub type StoreResult<T> = Result<T, StoreError>;
