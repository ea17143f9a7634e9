//! HTTP service for uploading datasets and training SVR models
//!
//! Provides the `/upload-info`, `/train-svr` and `/health` endpoints used by
//! the wizard frontend. Every request is self-contained: the file is parsed
//! fresh, the model lives for the duration of the request, and no state is
//! shared across requests.

mod api;
mod error;
mod handlers;
mod response;

pub use api::create_router;
pub use error::ApiError;
pub use response::ApiResponse;

use std::net::SocketAddr;
use tracing::info;

/// Server configuration, environment-driven with local-first defaults
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted upload size in bytes, enforced before parsing
    pub max_upload_size: usize,
    /// Allowed CORS origin; None means allow any (machine-local use)
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            max_upload_size: std::env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50 * 1024 * 1024),
            cors_origin: std::env::var("CORS_ORIGIN")
                .ok()
                .filter(|s| !s.is_empty() && s != "*"),
        }
    }
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let app = create_router(config.clone());

    info!(
        host = %config.host,
        port = config.port,
        max_upload_size_mb = config.max_upload_size / 1024 / 1024,
        started_at = %start_time.to_rfc3339(),
        "SVR training server starting"
    );
    info!(url = %format!("http://{}/health", addr), "Health endpoint available");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    let shutdown_signal = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        let stop_time = chrono::Utc::now();
        let uptime = stop_time.signed_duration_since(start_time);
        info!(
            stopped_at = %stop_time.to_rfc3339(),
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
