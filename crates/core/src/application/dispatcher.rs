// Job Dispatcher
// Maps a validated endpoint to its backend invocation. Stateless: lookup and
// delegation only. Failures surface as DispatchError and are recorded on the
// job by the admission controller; nothing is retried here.

use crate::application::constants::{SUBTITLE_POLL_INTERVAL, SUBTITLE_POLL_MAX_ATTEMPTS};
use crate::domain::{Endpoint, JobPayload};
use crate::port::{GenerationBackend, SubtitleBackend, SubtitleTaskState};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum DispatchError {
    /// The backend call settled with an error; carries its message.
    #[error("{0}")]
    Backend(String),

    /// Endpoint passed validation but has no registered backend.
    #[error("No backend registered for endpoint: {0}")]
    NoBackend(Endpoint),

    /// The subtitle polling loop exhausted its attempt budget.
    #[error("Subtitle task did not settle within {attempts} polls")]
    PollBudgetExhausted { attempts: u32 },
}

/// Registry from endpoint to backend, populated at construction time.
pub struct JobDispatcher {
    backends: HashMap<Endpoint, Arc<dyn GenerationBackend>>,
    subtitle: Arc<dyn SubtitleBackend>,
}

impl JobDispatcher {
    pub fn new(subtitle: Arc<dyn SubtitleBackend>) -> Self {
        Self {
            backends: HashMap::new(),
            subtitle,
        }
    }

    /// Register the backend for a single-call endpoint.
    pub fn register(mut self, endpoint: Endpoint, backend: Arc<dyn GenerationBackend>) -> Self {
        self.backends.insert(endpoint, backend);
        self
    }

    /// Invoke the backend for an already-validated endpoint.
    pub async fn invoke(
        &self,
        endpoint: Endpoint,
        payload: &JobPayload,
    ) -> Result<serde_json::Value, DispatchError> {
        match endpoint {
            Endpoint::SubtitleSubmit => self.invoke_subtitle(payload).await,
            _ => {
                let backend = self
                    .backends
                    .get(&endpoint)
                    .ok_or(DispatchError::NoBackend(endpoint))?;
                backend
                    .invoke(payload)
                    .await
                    .map_err(|e| DispatchError::Backend(e.to_string()))
            }
        }
    }

    /// Submit-then-poll flow: one submission call, then bounded polling with
    /// a fixed inter-poll delay until a terminal state.
    async fn invoke_subtitle(
        &self,
        payload: &JobPayload,
    ) -> Result<serde_json::Value, DispatchError> {
        let task_id = self
            .subtitle
            .submit(payload)
            .await
            .map_err(|e| DispatchError::Backend(e.to_string()))?;

        debug!(task_id = %task_id, "Subtitle task submitted, polling");

        for attempt in 1..=SUBTITLE_POLL_MAX_ATTEMPTS {
            sleep(SUBTITLE_POLL_INTERVAL).await;

            let state = self
                .subtitle
                .query(&task_id)
                .await
                .map_err(|e| DispatchError::Backend(e.to_string()))?;

            match state {
                SubtitleTaskState::Succeeded(result) => return Ok(result),
                SubtitleTaskState::Failed(message) => {
                    return Err(DispatchError::Backend(message));
                }
                SubtitleTaskState::Pending | SubtitleTaskState::Running => {
                    debug!(task_id = %task_id, attempt, "Subtitle task still running");
                }
            }
        }

        warn!(task_id = %task_id, "Subtitle poll budget exhausted");
        Err(DispatchError::PollBudgetExhausted {
            attempts: SUBTITLE_POLL_MAX_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::backend::mocks::{MockGenerationBackend, MockSubtitleBackend};

    fn payload() -> JobPayload {
        JobPayload::new(serde_json::json!({"prompt": "a red fox"}))
    }

    fn subtitle_stub() -> Arc<dyn SubtitleBackend> {
        Arc::new(MockSubtitleBackend::new(
            1,
            SubtitleTaskState::Succeeded(serde_json::json!({})),
        ))
    }

    #[tokio::test]
    async fn invoke_delegates_to_registered_backend() {
        let backend = Arc::new(MockGenerationBackend::new_success(
            serde_json::json!({"text": "hello"}),
        ));
        let dispatcher = JobDispatcher::new(subtitle_stub())
            .register(Endpoint::GenerateText, backend.clone());

        let result = dispatcher
            .invoke(Endpoint::GenerateText, &payload())
            .await
            .unwrap();

        assert_eq!(result["text"], "hello");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn invoke_surfaces_backend_message() {
        let dispatcher = JobDispatcher::new(subtitle_stub()).register(
            Endpoint::GenerateImage,
            Arc::new(MockGenerationBackend::new_fail("quota exceeded")),
        );

        let err = dispatcher
            .invoke(Endpoint::GenerateImage, &payload())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[tokio::test]
    async fn invoke_fails_for_unregistered_endpoint() {
        let dispatcher = JobDispatcher::new(subtitle_stub());

        let err = dispatcher
            .invoke(Endpoint::GenerateVideo, &payload())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::NoBackend(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn subtitle_flow_polls_until_success() {
        let subtitle = Arc::new(MockSubtitleBackend::new(
            3,
            SubtitleTaskState::Succeeded(serde_json::json!({"srt": "1\n00:00..."})),
        ));
        let dispatcher = JobDispatcher::new(subtitle.clone());

        let result = dispatcher
            .invoke(Endpoint::SubtitleSubmit, &payload())
            .await
            .unwrap();

        assert_eq!(result["srt"], "1\n00:00...");
        assert_eq!(subtitle.poll_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn subtitle_flow_exhausts_attempt_budget() {
        // Never settles.
        let subtitle = Arc::new(MockSubtitleBackend::new(
            usize::MAX,
            SubtitleTaskState::Succeeded(serde_json::json!({})),
        ));
        let dispatcher = JobDispatcher::new(subtitle);

        let err = dispatcher
            .invoke(Endpoint::SubtitleSubmit, &payload())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::PollBudgetExhausted { .. }));
    }
}
