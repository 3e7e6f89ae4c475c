//! Taskboard - terminal client for a remote task list service
//!
//! Taskboard keeps a local mirror of a remote task collection. Every change
//! goes to the service first; the mirror is only updated from acknowledged
//! responses, and failures reach the user as notifications.
//!
//! # Modules
//!
//! - [`api`] - Service client trait, HTTP implementation and error taxonomy
//! - [`domain`] - Task records, drafts and filter projection
//! - [`notify`] - User-visible notifications and their bus
//! - [`store`] - Task state store with stale-response protection
//! - [`prefs`] - Light/dark display preference
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//! - [`render`] - Terminal output for tasks and notifications

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod notify;
pub mod prefs;
pub mod render;
pub mod store;

// Re-export commonly used types
pub use api::{ApiError, ErrorKind, FieldErrors, HttpTaskApi, ListQuery, TaskApi};
pub use config::{ApiConfig, Config, DisplayConfig};
pub use domain::{DraftError, Filter, FilterCounts, NewTask, Task, TaskId, TaskPatch};
pub use notify::{Level, Notification, NotificationBus};
pub use prefs::{PreferenceStore, PrefsError};
pub use store::{StoreError, StoreResult, TaskState, TaskStore};
