// HTTP subtitle backend
// Two-step provider flow: a submission call returning a task id, then a
// status call the dispatcher polls until the task settles.

use crate::http_backend::error_message;
use async_trait::async_trait;
use gengate_core::domain::JobPayload;
use gengate_core::port::{BackendError, SubtitleBackend, SubtitleTaskState};
use std::time::Duration;
use tracing::debug;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct HttpSubtitleBackend {
    client: reqwest::Client,
    submit_url: String,
    query_url: String,
    api_key: Option<String>,
}

impl HttpSubtitleBackend {
    pub fn new(
        submit_url: impl Into<String>,
        query_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            submit_url: submit_url.into(),
            query_url: query_url.into(),
            api_key,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, BackendError> {
        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        if !status.is_success() {
            return Err(BackendError::Upstream {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl SubtitleBackend for HttpSubtitleBackend {
    async fn submit(&self, payload: &JobPayload) -> Result<String, BackendError> {
        debug!(url = %self.submit_url, "Submitting subtitle task");

        let request = self.authorize(self.client.post(&self.submit_url).json(payload.as_value()));
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let body = Self::read_json(response).await?;

        body.get("task_id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                BackendError::InvalidResponse("submit response missing task_id".to_string())
            })
    }

    async fn query(&self, task_id: &str) -> Result<SubtitleTaskState, BackendError> {
        let request = self.authorize(
            self.client
                .get(&self.query_url)
                .query(&[("task_id", task_id)]),
        );
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let body = Self::read_json(response).await?;

        let status = body.get("status").and_then(|v| v.as_str()).ok_or_else(|| {
            BackendError::InvalidResponse("query response missing status".to_string())
        })?;

        match status {
            "pending" => Ok(SubtitleTaskState::Pending),
            "running" | "processing" => Ok(SubtitleTaskState::Running),
            "succeeded" | "completed" => {
                let result = body.get("result").cloned().unwrap_or(body.clone());
                Ok(SubtitleTaskState::Succeeded(result))
            }
            "failed" => Ok(SubtitleTaskState::Failed(error_message(&body))),
            other => Err(BackendError::InvalidResponse(format!(
                "unknown subtitle task status: {}",
                other
            ))),
        }
    }
}
