//! GenGate Admission Queue - Main Entry Point
//! JSON-RPC server + admission queue + retention sweeper

mod telemetry;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use gengate_api_rpc::{server::RpcServerConfig, RpcServer};
use gengate_core::application::{shutdown_channel, JobDispatcher, QueueManager, SweepScheduler};
use gengate_core::domain::{Endpoint, QueueConfig};
use gengate_core::port::id_provider::UuidProvider;
use gengate_core::port::time_provider::SystemTimeProvider;
use gengate_core::port::{GenerationBackend, SubtitleBackend};
use gengate_infra_http::{HttpGenerationBackend, HttpSubtitleBackend};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_BACKEND_BASE: &str = "http://127.0.0.1:8801";

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Resolve the provider URL for one endpoint. Per-endpoint override via
/// GENGATE_BACKEND_URL_<NAME> (kebab-case name with '-' replaced by '_',
/// uppercased); otherwise <base>/<endpoint-name>.
fn backend_url(base: &str, endpoint: Endpoint) -> String {
    let var = format!(
        "GENGATE_BACKEND_URL_{}",
        endpoint.as_str().replace('-', "_").to_uppercase()
    );
    std::env::var(var).unwrap_or_else(|_| format!("{}/{}", base, endpoint.as_str()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging (JSON format for production)
    let log_format = std::env::var("GENGATE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("gengate=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("GenGate Admission Queue v{} starting...", VERSION);

    // 1.1. Initialize OpenTelemetry (optional)
    if let Err(e) = telemetry::init_telemetry() {
        tracing::warn!(error = ?e, "Failed to initialize OpenTelemetry (continuing without it)");
    }

    // 2. Load configuration
    let rpc_port: u16 = env_or("GENGATE_RPC_PORT", 9641);
    let backend_base =
        std::env::var("GENGATE_BACKEND_BASE").unwrap_or_else(|_| DEFAULT_BACKEND_BASE.to_string());
    let api_key = std::env::var("GENGATE_API_KEY").ok();

    let queue_config = QueueConfig {
        concurrency_limit: env_or("GENGATE_CONCURRENCY", 2),
        max_processing_history: env_or("GENGATE_PROCESSING_HISTORY", 50),
        max_archived_items: env_or("GENGATE_MAX_ARCHIVED", 1000),
        retention_window_ms: env_or("GENGATE_RETENTION_MINUTES", 10i64) * 60 * 1000,
        sweep_interval_ms: env_or("GENGATE_SWEEP_MINUTES", 5u64) * 60 * 1000,
    };

    info!(
        backend_base = %backend_base,
        concurrency_limit = queue_config.concurrency_limit,
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);

    let subtitle: Arc<dyn SubtitleBackend> = Arc::new(HttpSubtitleBackend::new(
        backend_url(&backend_base, Endpoint::SubtitleSubmit),
        std::env::var("GENGATE_BACKEND_URL_SUBTITLE_QUERY")
            .unwrap_or_else(|_| format!("{}/subtitle-query", backend_base)),
        api_key.clone(),
    ));

    let mut dispatcher = JobDispatcher::new(subtitle);
    for endpoint in Endpoint::ALL {
        if endpoint == Endpoint::SubtitleSubmit {
            continue;
        }
        let backend: Arc<dyn GenerationBackend> = Arc::new(HttpGenerationBackend::new(
            backend_url(&backend_base, endpoint),
            api_key.clone(),
        ));
        dispatcher = dispatcher.register(endpoint, backend);
    }

    let manager = Arc::new(QueueManager::new(
        Arc::new(dispatcher),
        time_provider,
        id_provider,
        queue_config,
    ));

    // 4. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let rpc_config = RpcServerConfig {
        port: rpc_port,
        ..Default::default()
    };
    let rpc_server = RpcServer::new(rpc_config, manager.clone());
    let rpc_handle = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 5. Start retention sweeper
    info!("Starting retention sweeper...");
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let sweeper = SweepScheduler::new(manager.clone());
    let sweeper_handle = tokio::spawn(async move {
        sweeper.run(shutdown_rx).await;
    });

    info!("System ready. Waiting for submissions...");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    shutdown_tx.shutdown();
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), sweeper_handle).await;

    info!("Shutdown complete.");

    Ok(())
}
