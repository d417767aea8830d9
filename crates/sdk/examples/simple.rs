//! Submit a job and poll it to a terminal state.

use gengate_sdk::{GenGateClient, SubmitRequest};
use serde_json::json;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = GenGateClient::connect("http://127.0.0.1:9641").await?;

    let submitted = client
        .submit(SubmitRequest {
            user_id: "example-user".to_string(),
            endpoint: "generate-text".to_string(),
            payload: Some(json!({"prompt": "one sentence about admission control"})),
        })
        .await?;
    println!("submitted: {}", submitted.job_id);

    loop {
        let job = client.job(&submitted.job_id).await?;
        println!("status: {}", job.status);
        match job.status.as_str() {
            "completed" => {
                println!("result: {}", job.result.unwrap_or_default());
                break;
            }
            "failed" => {
                println!("error: {}", job.error.unwrap_or_default());
                break;
            }
            _ => tokio::time::sleep(Duration::from_secs(1)).await,
        }
    }

    Ok(())
}
