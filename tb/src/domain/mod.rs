//! Domain types for the task list
//!
//! - [`Task`] and the request payloads derived from it
//! - [`Filter`] and the pure projection over a task collection

pub mod filter;
mod task;

pub use filter::{Filter, FilterCounts, project};
pub use task::{DraftError, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN, NewTask, Task, TaskId, TaskPatch};
