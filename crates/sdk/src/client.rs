//! GenGate Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{BatchView, JobView, StatsView, StatusView, SubmitRequest, SubmitResponse};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use std::time::Duration;

/// GenGate admission queue client
///
/// Provides a high-level interface to interact with the GenGate daemon.
///
/// # Example
///
/// ```no_run
/// use gengate_sdk::GenGateClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GenGateClient::connect("http://127.0.0.1:9641").await?;
/// # Ok(())
/// # }
/// ```
pub struct GenGateClient {
    client: HttpClient,
}

impl GenGateClient {
    /// Connect to the GenGate daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9641`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Submit a generation job
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use gengate_sdk::{GenGateClient, SubmitRequest};
    /// # use serde_json::json;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = GenGateClient::connect("http://127.0.0.1:9641").await?;
    /// let response = client.submit(SubmitRequest {
    ///     user_id: "fp-3f2a".to_string(),
    ///     endpoint: "generate-image".to_string(),
    ///     payload: Some(json!({"prompt": "a red fox"})),
    /// }).await?;
    ///
    /// println!("Job ID: {}", response.job_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit(&self, request: SubmitRequest) -> Result<SubmitResponse> {
        let mut params = ObjectParams::new();
        params.insert("user_id", request.user_id)?;
        params.insert("endpoint", request.endpoint)?;
        params.insert("payload", request.payload)?;

        let response: SubmitResponse = self.client.request("queue.submit.v1", params).await?;

        Ok(response)
    }

    /// Fetch one job by id
    pub async fn job(&self, job_id: impl Into<String>) -> Result<JobView> {
        let mut params = ObjectParams::new();
        params.insert("job_id", job_id.into())?;

        let response: JobView = self.client.request("queue.job.v1", params).await?;

        Ok(response)
    }

    /// Queue status for one user, or the global view when `user_id` is None
    pub async fn status(&self, user_id: Option<String>) -> Result<StatusView> {
        let mut params = ObjectParams::new();
        params.insert("user_id", user_id)?;

        let response: StatusView = self.client.request("queue.status.v1", params).await?;

        Ok(response)
    }

    /// Batched job/user lookups
    pub async fn batch(&self, job_ids: Vec<String>, user_ids: Vec<String>) -> Result<BatchView> {
        let mut params = ObjectParams::new();
        params.insert("job_ids", job_ids)?;
        params.insert("user_ids", user_ids)?;

        let response: BatchView = self.client.request("queue.batch.v1", params).await?;

        Ok(response)
    }

    /// Operational statistics
    pub async fn stats(&self) -> Result<StatsView> {
        let response: StatsView = self
            .client
            .request("admin.stats.v1", ObjectParams::new())
            .await?;

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_sdk_types() {
        // Basic smoke test to ensure SDK compiles
        // Integration tests require a running daemon
    }
}
