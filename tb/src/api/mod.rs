//! Remote task service client
//!
//! Provides the [`TaskApi`] abstraction, its HTTP implementation and the
//! error taxonomy every failure is classified into.

pub mod client;
mod error;
mod http;
mod types;

pub use client::TaskApi;
pub use error::{ApiError, ErrorKind, FieldErrors};
pub use http::HttpTaskApi;
pub use types::{ListQuery, TaskListBody};
