//! SDK Request/Response Types
//!
//! Mirrors the daemon's JSON-RPC surface.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// queue.submit.v1 parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub user_id: String,
    pub endpoint: String,
    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub job_id: String,
    pub status: String,
    pub endpoint: String,
}

/// queue.job.v1 result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobView {
    pub job_id: String,
    pub status: String,
    pub submitted_at: i64,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// queue.status.v1 result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusView {
    #[serde(default)]
    pub position: Option<usize>,
    #[serde(default)]
    pub estimated_wait_ms: Option<i64>,
    pub total_pending: usize,
    pub total_active: usize,
}

/// queue.batch.v1 result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchView {
    pub items: HashMap<String, Option<JobView>>,
    pub user_statuses: HashMap<String, UserStatusView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatusView {
    pub position: usize,
    pub estimated_wait_ms: i64,
    pub total_pending: usize,
    pub total_active: usize,
}

/// admin.stats.v1 result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsView {
    pub total_pending: usize,
    pub total_active: usize,
    pub total_archived: usize,
    pub avg_processing_ms: i64,
    pub uptime_seconds: i64,
}
