//! TaskStore - owner of the local task collection
//!
//! Every mutation goes through the remote service first; the local mirror is
//! only touched once the service has acknowledged the change.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::sequence::{SequenceGuard, Ticket};
use super::state::{StoreError, StoreResult, TaskState};
use crate::api::{ApiError, ListQuery, TaskApi};
use crate::domain::{Filter, NewTask, Task, TaskId, TaskPatch};
use crate::notify::NotificationBus;

#[derive(Default)]
struct Sequencing {
    tasks: SequenceGuard<TaskId>,
    fetches: SequenceGuard<()>,
}

struct Shared {
    api: Arc<dyn TaskApi>,
    notifier: NotificationBus,
    state: watch::Sender<TaskState>,
    sequencing: Mutex<Sequencing>,
}

/// Handle to the task store
///
/// Clones share state and cancellation. [`TaskStore::scoped`] shares state
/// but gets its own child cancellation token, so a view can be torn down
/// without touching requests started elsewhere.
#[derive(Clone)]
pub struct TaskStore {
    shared: Arc<Shared>,
    cancel: CancellationToken,
}

impl TaskStore {
    pub fn new(api: Arc<dyn TaskApi>, notifier: NotificationBus) -> Self {
        debug!("TaskStore::new: called");
        let (state, _) = watch::channel(TaskState::default());
        Self {
            shared: Arc::new(Shared {
                api,
                notifier,
                state,
                sequencing: Mutex::new(Sequencing::default()),
            }),
            cancel: CancellationToken::new(),
        }
    }

    /// Receive every state change from now on
    pub fn subscribe(&self) -> watch::Receiver<TaskState> {
        self.shared.state.subscribe()
    }

    pub fn snapshot(&self) -> TaskState {
        self.shared.state.borrow().clone()
    }

    pub fn notifier(&self) -> &NotificationBus {
        &self.shared.notifier
    }

    /// Handle for one consumer; closing it cancels only its own requests
    pub fn scoped(&self) -> TaskStore {
        Self {
            shared: Arc::clone(&self.shared),
            cancel: self.cancel.child_token(),
        }
    }

    /// Cancel in-flight requests of this handle (and its scopes). Their
    /// responses are never applied and later calls return
    /// [`StoreError::Cancelled`].
    pub fn close(&self) {
        debug!("TaskStore::close: called");
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // === Collection operations ===

    /// Reload the whole collection
    pub async fn fetch_all(&self) -> StoreResult<()> {
        self.fetch_with(&ListQuery::default()).await
    }

    /// Reload the whole collection with server-side query parameters
    pub async fn fetch_with(&self, query: &ListQuery) -> StoreResult<()> {
        debug!(?query, "TaskStore::fetch_with: called");
        if self.is_closed() {
            return Err(StoreError::Cancelled);
        }
        let ticket = self.shared.sequencing.lock().fetches.issue(&());
        self.shared.state.send_modify(|state| state.loading = true);

        let abandon = Abandon::new(&self.shared, Pending::Fetch(ticket.clone()));
        let result = self.call(self.shared.api.list(query)).await;
        abandon.disarm();
        self.settle_fetch(&ticket, result)
    }

    /// Create a task; on success it goes to the front of the collection
    pub async fn create(&self, task: NewTask) -> StoreResult<Task> {
        debug!(title = %task.title, "TaskStore::create: called");
        let created = self.call(self.shared.api.create(&task)).await?;

        let inserted = created.clone();
        self.shared.state.send_modify(move |state| {
            state.tasks.retain(|t| t.id != inserted.id);
            state.tasks.insert(0, inserted);
        });
        info!(id = %created.id, "TaskStore::create: task created");
        self.shared.notifier.success("Task created successfully!");
        Ok(created)
    }

    /// Apply a partial update; on success the task is replaced in place
    pub async fn update(&self, id: &TaskId, patch: TaskPatch) -> StoreResult<Task> {
        debug!(%id, ?patch, "TaskStore::update: called");
        let ticket = self.shared.sequencing.lock().tasks.issue(id);

        let abandon = Abandon::new(&self.shared, Pending::Task(ticket.clone()));
        let result = self.call(self.shared.api.update(id, &patch)).await;
        abandon.disarm();
        let updated = self.settle(&ticket, result, replace_in_place)?;

        info!(%id, "TaskStore::update: task updated");
        self.shared.notifier.success(match patch.completed {
            Some(true) => "Task completed!",
            Some(false) => "Task marked as active",
            None => "Task updated successfully",
        });
        Ok(updated)
    }

    /// Flip completion relative to the caller's last known value
    pub async fn toggle_complete(&self, id: &TaskId, current: bool) -> StoreResult<Task> {
        debug!(%id, current, "TaskStore::toggle_complete: called");
        self.update(id, TaskPatch::completed(!current)).await
    }

    /// Delete a task; on success it is removed from the collection
    pub async fn delete(&self, id: &TaskId) -> StoreResult<TaskId> {
        debug!(%id, "TaskStore::delete: called");
        let ticket = self.shared.sequencing.lock().tasks.issue(id);

        let abandon = Abandon::new(&self.shared, Pending::Task(ticket.clone()));
        let result = self.call(self.shared.api.delete(id)).await;
        abandon.disarm();
        let deleted = self.settle(&ticket, result, |state, id| state.tasks.retain(|t| &t.id != id))?;

        info!(%id, "TaskStore::delete: task deleted");
        self.shared.notifier.success("Task deleted successfully");
        Ok(deleted)
    }

    /// Re-read one task; refreshes the local copy if there is one
    pub async fn fetch_one(&self, id: &TaskId) -> StoreResult<Task> {
        debug!(%id, "TaskStore::fetch_one: called");
        let ticket = self.shared.sequencing.lock().tasks.issue(id);

        let abandon = Abandon::new(&self.shared, Pending::Task(ticket.clone()));
        let result = self.call(self.shared.api.get(id)).await;
        abandon.disarm();
        self.settle(&ticket, result, replace_in_place)
    }

    /// Change the active filter. Local only.
    pub fn set_filter(&self, filter: Filter) {
        debug!(%filter, "TaskStore::set_filter: called");
        if self.is_closed() {
            debug!("TaskStore::set_filter: handle closed, ignoring");
            return;
        }
        self.shared.state.send_if_modified(|state| {
            if state.filter == filter {
                false
            } else {
                state.filter = filter;
                true
            }
        });
    }

    // === Internals ===

    /// Run one service call under this handle's cancellation token. Failures
    /// are reported to the user here, exactly once.
    async fn call<T, F>(&self, request: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if self.cancel.is_cancelled() {
            debug!("TaskStore::call: handle closed");
            return Err(StoreError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("TaskStore::call: cancelled in flight");
                Err(StoreError::Cancelled)
            }
            result = request => result.map_err(|err| {
                self.shared.notifier.report(&err);
                StoreError::Api(err)
            }),
        }
    }

    /// Finish a per-task request, applying its result only if it is not stale
    fn settle<T>(
        &self,
        ticket: &Ticket<TaskId>,
        result: StoreResult<T>,
        apply: impl FnOnce(&mut TaskState, &T),
    ) -> StoreResult<T> {
        let mut sequencing = self.shared.sequencing.lock();
        let admitted = sequencing.tasks.complete(ticket, result.is_ok());
        if let Ok(value) = &result {
            if admitted {
                self.shared.state.send_modify(|state| apply(state, value));
            } else {
                debug!(id = %ticket.key(), seq = ticket.seq(), "TaskStore::settle: stale response discarded");
            }
        }
        result
    }

    fn settle_fetch(&self, ticket: &Ticket<()>, result: StoreResult<Vec<Task>>) -> StoreResult<()> {
        let mut sequencing = self.shared.sequencing.lock();
        let latest = sequencing.fetches.is_latest(ticket);
        let superseded = sequencing.fetches.is_superseded(ticket);
        let admitted = sequencing.fetches.complete(ticket, result.is_ok());

        let outcome = match result {
            Ok(tasks) if admitted => {
                info!(count = tasks.len(), "TaskStore::fetch_with: collection replaced");
                sequencing.tasks.prune_settled();
                self.shared.state.send_modify(move |state| {
                    state.tasks = tasks;
                    state.error = None;
                });
                Ok(())
            }
            Ok(_) => {
                debug!(seq = ticket.seq(), "TaskStore::fetch_with: stale list discarded");
                Ok(())
            }
            Err(StoreError::Api(err)) => {
                // an older failure must not mask a newer applied list
                if !superseded {
                    let message = err.to_string();
                    self.shared.state.send_modify(move |state| state.error = Some(message));
                }
                Err(StoreError::Api(err))
            }
            Err(err) => Err(err),
        };

        if latest {
            self.shared.state.send_modify(|state| state.loading = false);
        }
        outcome
    }
}

/// Ticket held while its request is in flight
enum Pending {
    Fetch(Ticket<()>),
    Task(Ticket<TaskId>),
}

/// Settles a ticket as not applied when the operation's future is dropped
/// before the response arrives. Disarmed once the response is in hand.
struct Abandon<'a> {
    shared: &'a Shared,
    pending: Option<Pending>,
}

impl<'a> Abandon<'a> {
    fn new(shared: &'a Shared, pending: Pending) -> Self {
        Self {
            shared,
            pending: Some(pending),
        }
    }

    fn disarm(mut self) {
        self.pending = None;
    }
}

impl Drop for Abandon<'_> {
    fn drop(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let mut sequencing = self.shared.sequencing.lock();
        match pending {
            Pending::Task(ticket) => {
                debug!(id = %ticket.key(), seq = ticket.seq(), "Abandon::drop: request dropped");
                sequencing.tasks.complete(&ticket, false);
            }
            Pending::Fetch(ticket) => {
                debug!(seq = ticket.seq(), "Abandon::drop: fetch dropped");
                let latest = sequencing.fetches.is_latest(&ticket);
                sequencing.fetches.complete(&ticket, false);
                if latest {
                    self.shared.state.send_modify(|state| state.loading = false);
                }
            }
        }
    }
}

fn replace_in_place(state: &mut TaskState, task: &Task) {
    if let Some(slot) = state.tasks.iter_mut().find(|t| t.id == task.id) {
        *slot = task.clone();
    }
}
