//! Command Line Interface
//!
//! Every option can also be set through the environment, which is how the
//! service is usually configured under systemd.

use clap::Parser;

use qc_core::constants::clamp_upload_limit;
use qc_core::constants::daemon::{DEFAULT_BIND_ADDR, DEFAULT_MAX_UPLOAD_BYTES};

#[derive(Parser, Debug)]
#[command(name = "qcontrollerd")]
#[command(author = "Henry Kleyn")]
#[command(version)]
#[command(about = "QController - sensor log quality control service")]
#[command(long_about = "QController - sensor log quality control service

Accepts sensor log uploads over HTTP and classifies every thermometer and
humidistat in the log against the reference conditions on its first line.

ROUTES:
    GET  /api/v1/health      Liveness probe
    POST /api/v1/evaluate    Upload a .log file (multipart field 'file')

ENVIRONMENT VARIABLES:
    QCONTROLLER_LOG=debug    Log filter (trace, debug, info, warn, error)")]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "QCONTROLLER_BIND", default_value = DEFAULT_BIND_ADDR)]
    pub bind: String,

    /// Largest accepted request body in bytes (clamped to 1 KiB..64 MiB)
    #[arg(long, env = "QCONTROLLER_MAX_UPLOAD", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl Cli {
    /// Upload limit after clamping to the supported range
    pub fn upload_limit(&self) -> usize {
        clamp_upload_limit(self.max_upload_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_arguments() {
        let cli = Cli::try_parse_from([
            "qcontrollerd",
            "--bind",
            "0.0.0.0:9000",
            "--max-upload-bytes",
            "2048",
        ])
        .unwrap();
        assert_eq!(cli.bind, "0.0.0.0:9000");
        assert_eq!(cli.upload_limit(), 2048);
    }

    #[test]
    fn test_upload_limit_is_clamped() {
        let cli = Cli::try_parse_from(["qcontrollerd", "--max-upload-bytes", "1"]).unwrap();
        assert_eq!(cli.max_upload_bytes, 1);
        assert_eq!(cli.upload_limit(), 1024);
    }

    #[test]
    fn test_rejects_non_numeric_limit() {
        assert!(Cli::try_parse_from(["qcontrollerd", "--max-upload-bytes", "lots"]).is_err());
    }
}
