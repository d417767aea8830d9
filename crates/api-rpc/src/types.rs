//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use gengate_core::application::{BatchStatusView, JobView, QueueStats, QueueStatusView};
use serde::{Deserialize, Serialize};

/// queue.submit.v1 - Submit a generation job
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub user_id: String,
    pub endpoint: String,
    /// Opaque request body; absence is a validation error.
    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub job_id: String,
    pub status: String,
    pub endpoint: String,
}

/// queue.job.v1 - Fetch one job
#[derive(Debug, Deserialize)]
pub struct JobRequest {
    pub job_id: String,
}

/// queue.status.v1 - Per-user queue status; global view when user_id omitted
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_wait_ms: Option<i64>,
    pub total_pending: usize,
    pub total_active: usize,
}

impl StatusResponse {
    pub fn for_user(view: QueueStatusView) -> Self {
        Self {
            position: Some(view.position),
            estimated_wait_ms: Some(view.estimated_wait_ms),
            total_pending: view.total_pending,
            total_active: view.total_active,
        }
    }

    pub fn global(total_pending: usize, total_active: usize) -> Self {
        Self {
            position: None,
            estimated_wait_ms: None,
            total_pending,
            total_active,
        }
    }
}

/// queue.batch.v1 - Batched job/user lookups
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub job_ids: Vec<String>,
    #[serde(default)]
    pub user_ids: Vec<String>,
}

pub type BatchResponse = BatchStatusView;

/// admin.stats.v1 - Operational statistics
#[derive(Debug, Deserialize)]
pub struct StatsRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub queue: QueueStats,
    pub uptime_seconds: i64,
}

pub type JobResponse = JobView;
