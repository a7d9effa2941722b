//! QController Daemon (qcontrollerd)
//!
//! HTTP front end for the sensor log evaluator. Clients upload a log file and
//! receive a JSON object mapping each sensor to its classification label.
//!
//! # Lifecycle
//! - Parse the command line (flags or `QCONTROLLER_*` environment variables)
//! - Initialize logging to the systemd journal, or stdout without one
//! - Serve requests one at a time until SIGINT/SIGTERM

mod cli;
mod server;
mod upload;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use qc_core::constants::daemon::{DEFAULT_LOG_LEVEL, JOURNALD_SOCKET, LOG_ENV_VAR};
use qc_core::supported_sensor_types;

use crate::cli::Cli;
use crate::server::ServerConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Global shutdown flag for clean termination
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

// ============================================================================
// Logging
// ============================================================================

/// Install the global subscriber. Returns whether the journal is in use.
fn init_logging(log_level: &str) -> bool {
    let mut use_journald = Path::new(JOURNALD_SOCKET).exists();

    if use_journald {
        match tracing_journald::layer() {
            Ok(journald_layer) => {
                use tracing_subscriber::prelude::*;
                tracing_subscriber::registry()
                    .with(journald_layer)
                    .with(tracing_subscriber::EnvFilter::new(log_level))
                    .init();
            }
            Err(e) => {
                eprintln!("Failed to create journald layer: {}, falling back to stdout", e);
                use_journald = false;
                init_stdout_logging(log_level);
            }
        }
    } else {
        init_stdout_logging(log_level);
    }

    use_journald
}

fn init_stdout_logging(log_level: &str) {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(log_level)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> anyhow::Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        eprintln!("PANIC at {}: {}", location, panic_info);
    }));

    let cli = Cli::parse();

    let log_level = std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    let use_journald = init_logging(&log_level);

    info!("STARTUP: qcontrollerd {} starting", VERSION);
    info!("STARTUP: Logging to {}", if use_journald { "systemd journal" } else { "stdout" });
    info!("STARTUP: Log level: {}", log_level);
    info!(
        "STARTUP: Supported sensor types: {}",
        supported_sensor_types().collect::<Vec<_>>().join(", ")
    );

    let max_upload_bytes = cli.upload_limit();
    if max_upload_bytes != cli.max_upload_bytes {
        warn!(
            "Upload limit {} out of range, using {} bytes",
            cli.max_upload_bytes, max_upload_bytes
        );
    }

    let config = ServerConfig::new(cli.bind.as_str(), max_upload_bytes)
        .context("Invalid server configuration")?;

    if let Err(e) = ctrlc::set_handler(|| {
        info!("SIGNAL: Received SIGINT/SIGTERM - initiating shutdown");
        SHUTDOWN.store(true, Ordering::SeqCst);
    }) {
        warn!("Failed to set signal handler: {}. Shutdown via signals may not work cleanly.", e);
    }

    server::run_server(&config, &SHUTDOWN).context("Server error")?;

    info!("SHUTDOWN: qcontrollerd terminated gracefully");
    Ok(())
}
