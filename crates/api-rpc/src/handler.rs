//! RPC Method Handlers
//!
//! Implements the business logic for each JSON-RPC method by delegating to
//! the queue manager.

use crate::error::{throttled, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::{
    BatchRequest, BatchResponse, JobRequest, JobResponse, StatsRequest, StatsResponse,
    StatusRequest, StatusResponse, SubmitRequest, SubmitResponse,
};
use gengate_core::application::QueueManager;
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    manager: Arc<QueueManager>,
    rate_limiter: RateLimiter,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(manager: Arc<QueueManager>) -> Self {
        // Default: 200 burst, 100 req/sec (configurable via env)
        let max_burst: u32 = std::env::var("GENGATE_RATE_LIMIT_BURST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(200);

        let rate_per_sec: u32 = std::env::var("GENGATE_RATE_LIMIT_RATE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        Self {
            manager,
            rate_limiter: RateLimiter::new(max_burst, rate_per_sec),
            start_time: std::time::Instant::now(),
        }
    }

    /// queue.submit.v1
    pub async fn submit(&self, params: SubmitRequest) -> Result<SubmitResponse, ErrorObjectOwned> {
        if !self.rate_limiter.check().await {
            return Err(throttled());
        }

        let endpoint = params.endpoint.clone();
        let job_id = self
            .manager
            .submit(params.user_id, &params.endpoint, params.payload)
            .await
            .map_err(to_rpc_error)?;

        Ok(SubmitResponse {
            job_id,
            status: "queued".to_string(),
            endpoint,
        })
    }

    /// queue.job.v1
    pub async fn job(&self, params: JobRequest) -> Result<JobResponse, ErrorObjectOwned> {
        self.manager
            .job_view(&params.job_id)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.status.v1
    pub async fn status(&self, params: StatusRequest) -> Result<StatusResponse, ErrorObjectOwned> {
        match params.user_id {
            Some(user_id) => Ok(StatusResponse::for_user(
                self.manager.user_status(&user_id).await,
            )),
            None => {
                let global = self.manager.global_status().await;
                Ok(StatusResponse::global(
                    global.total_pending,
                    global.total_active,
                ))
            }
        }
    }

    /// queue.batch.v1
    pub async fn batch(&self, params: BatchRequest) -> Result<BatchResponse, ErrorObjectOwned> {
        Ok(self
            .manager
            .batch_status(&params.job_ids, &params.user_ids)
            .await)
    }

    /// admin.stats.v1
    pub async fn stats(&self, _params: StatsRequest) -> Result<StatsResponse, ErrorObjectOwned> {
        Ok(StatsResponse {
            queue: self.manager.stats().await,
            uptime_seconds: self.start_time.elapsed().as_secs() as i64,
        })
    }
}
