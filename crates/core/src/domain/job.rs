// Job Domain Model

use crate::domain::endpoint::Endpoint;
use serde::{Deserialize, Serialize};

/// Job ID (UUID v4)
pub type JobId = String;

/// Caller fingerprint. Best-effort grouping key, never an access-control
/// boundary.
pub type UserId = String;

/// Job State
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Queued => write!(f, "queued"),
            JobState::Processing => write!(f, "processing"),
            JobState::Completed => write!(f, "completed"),
            JobState::Failed => write!(f, "failed"),
        }
    }
}

/// Job Payload (opaque JSON, forwarded verbatim to the backend)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPayload(serde_json::Value);

impl JobPayload {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Job Entity
///
/// Lives in exactly one of the store's three collections at any time:
/// pending (Queued), active (Processing), archived (Completed/Failed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub user_id: UserId,
    pub endpoint: Endpoint,
    pub payload: JobPayload,

    pub state: JobState,

    pub submitted_at: i64, // epoch ms, immutable
    pub started_at: Option<i64>,
    pub finished_at: Option<i64>,

    /// Present iff state == Completed.
    pub result: Option<serde_json::Value>,
    /// Present iff state == Failed.
    pub error: Option<String>,
}

impl Job {
    /// Create a new Job in `Queued` state.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique job ID (injected, not generated)
    /// * `submitted_at` - Submission timestamp in epoch ms (injected, not system time)
    /// * `user_id` - Caller fingerprint
    /// * `endpoint` - Validated target endpoint
    /// * `payload` - Opaque request body
    pub fn new(
        id: impl Into<String>,
        submitted_at: i64,
        user_id: impl Into<String>,
        endpoint: Endpoint,
        payload: JobPayload,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            endpoint,
            payload,
            state: JobState::Queued,
            submitted_at,
            started_at: None,
            finished_at: None,
            result: None,
            error: None,
        }
    }

    /// Create a test job with deterministic ID and timestamp.
    ///
    /// Uses a simple counter for deterministic test IDs (test-1, test-2, ...).
    /// Timestamps start at 1000 and increment by 1000.
    ///
    /// **Note**: This method should only be used in tests. For production code,
    /// always inject ID and time via providers.
    pub fn new_test(user_id: impl Into<String>, endpoint: Endpoint, payload: JobPayload) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let id = format!("test-{}", counter);
        let submitted_at = (counter * 1000) as i64;

        Self::new(id, submitted_at, user_id, endpoint, payload)
    }

    /// Transition to Processing with explicit timestamp
    pub fn start(&mut self, now_millis: i64) -> crate::domain::error::Result<()> {
        if self.state != JobState::Queued {
            return Err(crate::domain::error::DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: "processing".to_string(),
            });
        }
        self.state = JobState::Processing;
        self.started_at = Some(now_millis);
        Ok(())
    }

    /// Transition to Completed with the backend's success payload
    pub fn complete(
        &mut self,
        now_millis: i64,
        result: serde_json::Value,
    ) -> crate::domain::error::Result<()> {
        if self.state != JobState::Processing {
            return Err(crate::domain::error::DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: "completed".to_string(),
            });
        }
        self.state = JobState::Completed;
        self.finished_at = Some(now_millis);
        self.result = Some(result);
        Ok(())
    }

    /// Transition to Failed with the dispatcher's error message
    pub fn fail(
        &mut self,
        now_millis: i64,
        message: impl Into<String>,
    ) -> crate::domain::error::Result<()> {
        if self.state != JobState::Processing {
            return Err(crate::domain::error::DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: "failed".to_string(),
            });
        }
        self.state = JobState::Failed;
        self.finished_at = Some(now_millis);
        self.error = Some(message.into());
        Ok(())
    }

    /// Terminal states are absorbing.
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, JobState::Completed | JobState::Failed)
    }
}
