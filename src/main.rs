//! header-guard: security header proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ axum (request id, trace, timeout)
//!                 │
//!                 ▼
//!            routing::Router ──▶ upstream (hyper-util client)
//!                                      │
//!   Client ◀── ResponseFinalizer ◀─────┘
//!                 │
//!                 └─ ResponsePipeline
//!                      ├─ SecurityHeadersStage → security::policy → headers::set_or_clear
//!                      └─ RequestIdStage
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use header_guard::lifecycle::{signals, startup, Shutdown};
use header_guard::observability::logging;

#[derive(Parser)]
#[command(name = "header-guard")]
#[command(about = "Reverse proxy that enforces security response headers", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration, print resolved route settings, and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match startup::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("header-guard: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.check {
        return match startup::describe_routes(&config) {
            Ok(lines) => {
                for line in lines {
                    println!("{line}");
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("header-guard: {e}");
                ExitCode::FAILURE
            }
        };
    }

    logging::init_logging(&config.observability);
    tracing::info!("header-guard v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    if let Err(e) = startup::run(config, &shutdown).await {
        tracing::error!(error = %e, "Fatal error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
