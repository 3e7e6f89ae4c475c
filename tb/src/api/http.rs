//! HTTP implementation of the task service client
//!
//! Talks to a REST collection rooted at `{base_url}/tasks/`. Each call is a
//! single request bounded by the configured timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiError, ListQuery, TaskApi, TaskListBody};
use crate::config::ApiConfig;
use crate::domain::{NewTask, Task, TaskId, TaskPatch};

/// reqwest-backed [`TaskApi`]
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    base_url: Url,
    http: Client,
    timeout: Duration,
}

impl HttpTaskApi {
    /// Create a new client from configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        debug!(?config, "HttpTaskApi::from_config: called");
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Unexpected(format!("invalid base url '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Unexpected(format!("invalid base url '{}'", config.base_url)));
        }

        let timeout = Duration::from_millis(config.timeout_ms);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Unexpected(e.to_string()))?;

        Ok(Self {
            base_url,
            http,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build `{base_url}/{segments...}/`, keeping any path on the base url
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::Unexpected(format!("invalid base url '{}'", self.base_url)))?;
            path.pop_if_empty().extend(segments).push("");
        }
        Ok(url)
    }

    fn collection_url(&self) -> Result<Url, ApiError> {
        self.endpoint(&["tasks"])
    }

    fn task_url(&self, id: &TaskId) -> Result<Url, ApiError> {
        self.endpoint(&["tasks", &id.to_string()])
    }

    /// Send a request and return the body of a 2xx response
    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e, self.timeout))?;

        let status = response.status();
        let body = response.bytes().await;

        if !status.is_success() {
            debug!(%status, "HttpTaskApi::send: error status");
            // the status alone classifies the failure when the body is lost
            let body = match body {
                Ok(body) => body.to_vec(),
                Err(e) => {
                    debug!(error = %e, "HttpTaskApi::send: error body unreadable");
                    Vec::new()
                }
            };
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        let body = body.map_err(|e| ApiError::from_transport(&e, self.timeout))?;

        debug!(%status, body_len = body.len(), "HttpTaskApi::send: success");
        Ok(body.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Unexpected(format!("invalid response body: {}", e)))
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Task>, ApiError> {
        debug!(?query, "HttpTaskApi::list: called");
        let url = self.collection_url()?;
        let body: TaskListBody = self.send_json(self.http.get(url).query(query)).await?;
        let tasks = body.into_tasks();
        debug!(count = tasks.len(), "HttpTaskApi::list: received");
        Ok(tasks)
    }

    async fn get(&self, id: &TaskId) -> Result<Task, ApiError> {
        debug!(%id, "HttpTaskApi::get: called");
        let url = self.task_url(id)?;
        self.send_json(self.http.get(url)).await
    }

    async fn create(&self, task: &NewTask) -> Result<Task, ApiError> {
        debug!(title = %task.title, "HttpTaskApi::create: called");
        let url = self.collection_url()?;
        self.send_json(self.http.post(url).json(task)).await
    }

    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        debug!(%id, ?patch, "HttpTaskApi::update: called");
        let url = self.task_url(id)?;
        self.send_json(self.http.patch(url).json(patch)).await
    }

    async fn delete(&self, id: &TaskId) -> Result<TaskId, ApiError> {
        debug!(%id, "HttpTaskApi::delete: called");
        let url = self.task_url(id)?;
        self.send(self.http.delete(url)).await?;
        Ok(id.clone())
    }
}
