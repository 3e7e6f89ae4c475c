//! Wire types specific to the task collection endpoint

use serde::{Deserialize, Serialize};

use crate::domain::{Filter, Task};

/// Query parameters accepted by `GET tasks/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,

    /// Free-text search over title and description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// `created_at`, `-created_at`, `title` or `-title`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

impl ListQuery {
    pub fn for_filter(filter: Filter) -> Self {
        Self {
            completed: filter.completed_param(),
            ..Default::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_ordering(mut self, ordering: impl Into<String>) -> Self {
        self.ordering = Some(ordering.into());
        self
    }
}

/// Body of a list response: a bare array, or a paginated envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TaskListBody {
    Plain(Vec<Task>),
    Page { results: Vec<Task> },
}

impl TaskListBody {
    pub fn into_tasks(self) -> Vec<Task> {
        match self {
            TaskListBody::Plain(tasks) => tasks,
            TaskListBody::Page { results } => results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASK: &str = r#"{"id": 1, "title": "Buy milk", "description": null, "completed": false, "created_at": "2024-01-01T00:00:00Z"}"#;

    #[test]
    fn test_plain_list() {
        let body: TaskListBody = serde_json::from_str(&format!("[{}]", TASK)).unwrap();
        let tasks = body.into_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Buy milk");
    }

    #[test]
    fn test_envelope() {
        let json = format!(r#"{{"count": 1, "next": null, "previous": null, "results": [{}]}}"#, TASK);
        let body: TaskListBody = serde_json::from_str(&json).unwrap();
        assert_eq!(body.into_tasks().len(), 1);
    }

    #[test]
    fn test_empty_forms() {
        let body: TaskListBody = serde_json::from_str("[]").unwrap();
        assert!(body.into_tasks().is_empty());
        let body: TaskListBody = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(body.into_tasks().is_empty());
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert!(serde_json::from_str::<TaskListBody>(r#"{"items": []}"#).is_err());
        assert!(serde_json::from_str::<TaskListBody>(r#""tasks""#).is_err());
    }

    #[test]
    fn test_query_serialization_skips_absent() {
        let query = ListQuery::for_filter(Filter::Active).with_search("milk");
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            serde_json::json!({"completed": false, "search": "milk"})
        );
        assert_eq!(serde_json::to_value(ListQuery::default()).unwrap(), serde_json::json!({}));
    }
}
