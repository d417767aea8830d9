// Generation Backend Ports
// Boundary contract to the external generation providers. Each allow-listed
// endpoint maps to one asynchronous backend call; subtitle submission
// additionally exposes a polling call for its task status.

use crate::domain::JobPayload;
use async_trait::async_trait;
use thiserror::Error;

/// Backend call errors
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

/// Single-call generation backend.
///
/// Resolves with the provider's success payload or rejects with an error
/// carrying the provider's message. Retry/backoff, if any, is the provider
/// client's own concern.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn invoke(&self, payload: &JobPayload) -> Result<serde_json::Value, BackendError>;
}

/// Terminal/non-terminal states of a submitted subtitle task.
#[derive(Debug, Clone, PartialEq)]
pub enum SubtitleTaskState {
    Pending,
    Running,
    Succeeded(serde_json::Value),
    Failed(String),
}

/// Two-step subtitle backend: submit returns a task id, query polls it.
#[async_trait]
pub trait SubtitleBackend: Send + Sync {
    /// Submit the subtitle task; returns the provider task id.
    async fn submit(&self, payload: &JobPayload) -> Result<String, BackendError>;

    /// Poll the task status by provider task id.
    async fn query(&self, task_id: &str) -> Result<SubtitleTaskState, BackendError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock backend behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Resolve with the given payload
        Success(serde_json::Value),
        /// Reject with message
        Fail(String),
        /// Sleep, then resolve with the given payload
        Delay(u64, serde_json::Value),
    }

    /// Mock generation backend for testing
    pub struct MockGenerationBackend {
        behavior: Mutex<MockBehavior>,
        call_count: AtomicUsize,
    }

    impl MockGenerationBackend {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Mutex::new(behavior),
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn new_success(result: serde_json::Value) -> Self {
            Self::new(MockBehavior::Success(result))
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        pub fn new_delay(delay_ms: u64, result: serde_json::Value) -> Self {
            Self::new(MockBehavior::Delay(delay_ms, result))
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationBackend for MockGenerationBackend {
        async fn invoke(&self, _payload: &JobPayload) -> Result<serde_json::Value, BackendError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Success(result) => Ok(result),
                MockBehavior::Fail(msg) => Err(BackendError::Upstream {
                    status: 500,
                    message: msg,
                }),
                MockBehavior::Delay(ms, result) => {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    Ok(result)
                }
            }
        }
    }

    /// Mock subtitle backend: succeeds (or fails) after a scripted number of
    /// polls.
    pub struct MockSubtitleBackend {
        polls_until_done: usize,
        outcome: SubtitleTaskState,
        poll_count: AtomicUsize,
    }

    impl MockSubtitleBackend {
        pub fn new(polls_until_done: usize, outcome: SubtitleTaskState) -> Self {
            Self {
                polls_until_done,
                outcome,
                poll_count: AtomicUsize::new(0),
            }
        }

        pub fn poll_count(&self) -> usize {
            self.poll_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SubtitleBackend for MockSubtitleBackend {
        async fn submit(&self, _payload: &JobPayload) -> Result<String, BackendError> {
            Ok("task-1".to_string())
        }

        async fn query(&self, _task_id: &str) -> Result<SubtitleTaskState, BackendError> {
            let polls = self.poll_count.fetch_add(1, Ordering::SeqCst) + 1;
            if polls >= self.polls_until_done {
                Ok(self.outcome.clone())
            } else {
                Ok(SubtitleTaskState::Running)
            }
        }
    }
}
