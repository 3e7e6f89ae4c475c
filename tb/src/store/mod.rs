//! Task state store
//!
//! [`TaskStore`] owns the local mirror of the remote collection. Consumers
//! read [`TaskState`] snapshots or subscribe to changes, and mutate only
//! through the store's operations.

mod manager;
mod sequence;
mod state;

pub use manager::TaskStore;
pub use sequence::{SequenceGuard, Ticket};
pub use state::{StoreError, StoreResult, TaskState};
