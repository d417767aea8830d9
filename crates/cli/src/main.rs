//! GenGate CLI - Command-line interface for the GenGate admission queue

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9641";

#[derive(Parser)]
#[command(name = "gengate")]
#[command(about = "GenGate Admission Queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "GENGATE_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a generation job
    Submit {
        /// Caller fingerprint
        #[arg(short, long)]
        user: String,

        /// Endpoint name (e.g., generate-text, generate-image)
        #[arg(short, long)]
        endpoint: String,

        /// Payload as JSON string
        #[arg(long)]
        payload: String,
    },

    /// Show one job
    Job {
        /// Job ID
        job_id: String,
    },

    /// Show queue status (per-user with --user, global otherwise)
    Status {
        /// Caller fingerprint
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show operational statistics
    Stats,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct SubmitResult {
    job_id: String,
    status: String,
    endpoint: String,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Submit {
            user,
            endpoint,
            payload,
        } => {
            let payload_json: serde_json::Value =
                serde_json::from_str(&payload).context("Invalid JSON payload")?;

            let params = json!({
                "user_id": user,
                "endpoint": endpoint,
                "payload": payload_json,
            });

            let result = call_rpc(&cli.rpc_url, "queue.submit.v1", params).await?;
            let submit_result: SubmitResult = serde_json::from_value(result)?;

            println!("{}", "✓ Job submitted".green().bold());
            println!();

            let table = Table::new(vec![submit_result]).to_string();
            println!("{}", table);
        }

        Commands::Job { job_id } => {
            let params = json!({ "job_id": job_id });

            let job = call_rpc(&cli.rpc_url, "queue.job.v1", params).await?;

            let status = job["status"].as_str().unwrap_or("unknown");
            let status_colored = match status {
                "completed" => status.green(),
                "failed" => status.red(),
                "processing" => status.yellow(),
                _ => status.normal(),
            };

            println!("{} {}", "Job:".bold(), job_id);
            println!("  {} {}", "Status:".bold(), status_colored);
            println!("  {} {}", "Submitted:".bold(), job["submitted_at"]);
            if let Some(result) = job.get("result") {
                println!("  {} {}", "Result:".bold(), result);
            }
            if let Some(error) = job.get("error").and_then(|e| e.as_str()) {
                println!("  {} {}", "Error:".bold(), error.red());
            }
        }

        Commands::Status { user } => {
            let params = json!({ "user_id": user });

            let status = call_rpc(&cli.rpc_url, "queue.status.v1", params).await?;

            println!("{}", "Queue Status".cyan().bold());
            println!();
            if let Some(position) = status.get("position").and_then(|p| p.as_u64()) {
                println!("  {} {}", "Position:".bold(), position);
                if let Some(wait) = status.get("estimated_wait_ms").and_then(|w| w.as_i64()) {
                    println!("  {} {:.1}s", "Estimated wait:".bold(), wait as f64 / 1000.0);
                }
            }
            println!("  {} {}", "Pending:".bold(), status["total_pending"]);
            println!("  {} {}", "Active:".bold(), status["total_active"]);
        }

        Commands::Stats => {
            println!("{}", "System Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Pending:".bold(), stats["total_pending"]);
                    println!("  {} {}", "Active:".bold(), stats["total_active"]);
                    println!("  {} {}", "Archived:".bold(), stats["total_archived"]);
                    println!();
                    let avg_s = stats["avg_processing_ms"].as_i64().unwrap_or(0) as f64 / 1000.0;
                    println!("  {} {:.1}s", "Avg processing:".bold(), avg_s);
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
