//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Compile routes and the response pipeline
//! - Start the metrics exporter
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::path::Path;

use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, ProxyConfig};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::metrics;
use crate::routing::{Router, RouterError};

/// Fatal error during startup or while serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("routing error: {0}")]
    Routes(#[from] RouterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load the config at `path`, or the defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<ProxyConfig, StartupError> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(ProxyConfig::default()),
    }
}

/// Compile routes and describe each one's resolved security settings.
pub fn describe_routes(config: &ProxyConfig) -> Result<Vec<String>, StartupError> {
    let router = Router::from_config(config)?;
    let mut lines: Vec<String> = router
        .routes()
        .iter()
        .map(|r| format!("{} -> {}: {:?}", r.name, r.upstream, r.settings))
        .collect();
    lines.push(format!("(default): {:?}", router.default_settings()));
    Ok(lines)
}

/// Start the proxy and serve until `shutdown` fires.
pub async fn run(config: ProxyConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        scheme = %config.listener.scheme,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
