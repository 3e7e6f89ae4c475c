//! TaskApi trait definition

use async_trait::async_trait;

use super::{ApiError, ListQuery};
use crate::domain::{NewTask, Task, TaskId, TaskPatch};

/// Remote task service
///
/// One request per call and no retries: a failed attempt is returned to the
/// caller as-is.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetch the collection, unwrapping a paginated envelope if present
    async fn list(&self, query: &ListQuery) -> Result<Vec<Task>, ApiError>;

    /// Fetch one task; unknown ids yield [`ApiError::NotFound`]
    async fn get(&self, id: &TaskId) -> Result<Task, ApiError>;

    /// Create a task and return it with server-assigned fields populated
    async fn create(&self, task: &NewTask) -> Result<Task, ApiError>;

    /// Apply a partial update and return the full updated task
    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ApiError>;

    /// Delete a task and return its id
    async fn delete(&self, id: &TaskId) -> Result<TaskId, ApiError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use tokio::sync::oneshot;
    use tracing::debug;

    /// A call observed by [`MockTaskApi`]
    #[derive(Debug, Clone, PartialEq)]
    pub enum MockCall {
        List(ListQuery),
        Get(TaskId),
        Create(NewTask),
        Update(TaskId, TaskPatch),
        Delete(TaskId),
    }

    /// A scripted reply, consumed in call order
    #[derive(Debug)]
    pub enum MockReply {
        Tasks(Result<Vec<Task>, ApiError>),
        Task(Result<Task, ApiError>),
        Deleted(Result<TaskId, ApiError>),
    }

    struct Scripted {
        reply: MockReply,
        gate: Option<oneshot::Receiver<()>>,
    }

    /// Mock task service for unit tests
    ///
    /// Replies are handed out in the order calls arrive. A gated reply is
    /// taken at call time but only returned once its sender fires, which lets
    /// tests decide the order in which responses land.
    #[derive(Default)]
    pub struct MockTaskApi {
        replies: Mutex<VecDeque<Scripted>>,
        calls: Mutex<Vec<MockCall>>,
    }

    impl MockTaskApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push(&self, reply: MockReply) {
            self.replies.lock().push_back(Scripted { reply, gate: None });
        }

        pub fn push_gated(&self, reply: MockReply) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.replies.lock().push_back(Scripted { reply, gate: Some(rx) });
            tx
        }

        pub fn calls(&self) -> Vec<MockCall> {
            self.calls.lock().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().len()
        }

        async fn next(&self, call: MockCall) -> Result<MockReply, ApiError> {
            debug!(?call, "MockTaskApi::next: called");
            self.calls.lock().push(call);
            let scripted = self.replies.lock().pop_front();
            let Some(Scripted { reply, gate }) = scripted else {
                return Err(ApiError::Unexpected("No more mock responses".to_string()));
            };
            if let Some(gate) = gate {
                // a dropped sender releases the reply too
                let _ = gate.await;
            }
            Ok(reply)
        }
    }

    fn mismatch(reply: MockReply) -> ApiError {
        ApiError::Unexpected(format!("mock reply does not fit this call: {:?}", reply))
    }

    #[async_trait]
    impl TaskApi for MockTaskApi {
        async fn list(&self, query: &ListQuery) -> Result<Vec<Task>, ApiError> {
            match self.next(MockCall::List(query.clone())).await? {
                MockReply::Tasks(result) => result,
                other => Err(mismatch(other)),
            }
        }

        async fn get(&self, id: &TaskId) -> Result<Task, ApiError> {
            match self.next(MockCall::Get(id.clone())).await? {
                MockReply::Task(result) => result,
                other => Err(mismatch(other)),
            }
        }

        async fn create(&self, task: &NewTask) -> Result<Task, ApiError> {
            match self.next(MockCall::Create(task.clone())).await? {
                MockReply::Task(result) => result,
                other => Err(mismatch(other)),
            }
        }

        async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
            match self.next(MockCall::Update(id.clone(), patch.clone())).await? {
                MockReply::Task(result) => result,
                other => Err(mismatch(other)),
            }
        }

        async fn delete(&self, id: &TaskId) -> Result<TaskId, ApiError> {
            match self.next(MockCall::Delete(id.clone())).await? {
                MockReply::Deleted(result) => result,
                other => Err(mismatch(other)),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_returns_replies_in_order() {
            let api = MockTaskApi::new();
            api.push(MockReply::Tasks(Ok(vec![])));
            api.push(MockReply::Deleted(Ok(TaskId::Number(4))));

            assert!(api.list(&ListQuery::default()).await.unwrap().is_empty());
            assert_eq!(api.delete(&TaskId::Number(4)).await.unwrap(), TaskId::Number(4));
            assert_eq!(
                api.calls(),
                vec![MockCall::List(ListQuery::default()), MockCall::Delete(TaskId::Number(4))]
            );
        }

        #[tokio::test]
        async fn test_mock_errors_when_exhausted() {
            let api = MockTaskApi::new();
            let result = api.get(&TaskId::Number(1)).await;
            assert!(matches!(result, Err(ApiError::Unexpected(_))));
            assert_eq!(api.call_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_rejects_mismatched_reply() {
            let api = MockTaskApi::new();
            api.push(MockReply::Tasks(Ok(vec![])));
            assert!(api.delete(&TaskId::Number(1)).await.is_err());
        }
    }
}
