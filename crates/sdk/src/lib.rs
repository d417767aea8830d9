//! GenGate SDK - Rust Client Library
//!
//! Provides a convenient client for interacting with the GenGate daemon.
//!
//! # Example
//!
//! ```no_run
//! use gengate_sdk::{GenGateClient, SubmitRequest};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect to daemon
//!     let client = GenGateClient::connect("http://127.0.0.1:9641").await?;
//!
//!     // Submit a job
//!     let response = client.submit(SubmitRequest {
//!         user_id: "fp-3f2a".to_string(),
//!         endpoint: "generate-text".to_string(),
//!         payload: Some(json!({"prompt": "haiku about queues"})),
//!     }).await?;
//!
//!     println!("Job submitted: {}", response.job_id);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::GenGateClient;
pub use error::{Result, SdkError};
pub use types::{
    BatchView, JobView, StatsView, StatusView, SubmitRequest, SubmitResponse, UserStatusView,
};
