//! Constants and configuration values for QController
//!
//! Centralizes the log grammar tokens, classification thresholds and daemon
//! defaults. Never use magic numbers in other files - add them here first.

use std::time::Duration;

/// Tokens and shapes of the sensor log grammar
pub mod grammar {
    /// First token of the reference line
    pub const REFERENCE_KEYWORD: &str = "reference";

    /// Sensor headers (`<type> <name>`) and readings (`<timestamp> <value>`)
    pub const PAIR_LINE_TOKENS: usize = 2;

    /// Reading timestamp format (minute precision, no timezone)
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

    /// Exact length of a `YYYY-MM-DDTHH:MM` timestamp
    pub const TIMESTAMP_LEN: usize = 16;
}

/// Reference attribute names as they appear in parsed logs
pub mod reference {
    pub const TEMPERATURE: &str = "temperature";
    pub const HUMIDITY: &str = "humidity";
}

/// Thermometer classification thresholds
pub mod thermometer {
    /// Sample standard deviation needs at least two points
    pub const MIN_READINGS: usize = 2;

    /// Maximum |mean - reference| for the two top precision tiers
    pub const MAX_MEAN_DEVIATION: f64 = 0.5;

    /// Standard deviation must be strictly below this for "ultra precise"
    pub const ULTRA_PRECISE_MAX_STD_DEV: f64 = 3.0;

    /// Standard deviation must be strictly below this for "very precise"
    pub const VERY_PRECISE_MAX_STD_DEV: f64 = 5.0;
}

/// Humidistat classification thresholds
pub mod humidistat {
    pub const MIN_READINGS: usize = 1;

    /// Any reading further than this from the reference discards the sensor
    pub const MAX_DEVIATION: f64 = 1.0;
}

/// Daemon defaults and limits
pub mod daemon {
    use super::Duration;

    /// Default listen address
    pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

    /// Default maximum accepted request body (1 MiB)
    pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

    /// Lower bound for the configurable upload limit
    pub const MIN_MAX_UPLOAD_BYTES: usize = 1024;

    /// Upper bound for the configurable upload limit
    pub const MAX_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

    /// How long the accept loop blocks before re-checking the shutdown flag
    pub const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(250);

    /// How long a client may take to deliver its request body
    pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

    /// Environment variable holding the log filter
    pub const LOG_ENV_VAR: &str = "QCONTROLLER_LOG";

    /// Log filter used when `LOG_ENV_VAR` is unset
    pub const DEFAULT_LOG_LEVEL: &str = "info";

    /// Presence of this socket means the journal is available
    pub const JOURNALD_SOCKET: &str = "/run/systemd/journal/socket";
}

/// Clamp a requested upload limit into the supported range
pub fn clamp_upload_limit(requested: usize) -> usize {
    requested.clamp(daemon::MIN_MAX_UPLOAD_BYTES, daemon::MAX_MAX_UPLOAD_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_upload_limit() {
        assert_eq!(clamp_upload_limit(0), daemon::MIN_MAX_UPLOAD_BYTES);
        assert_eq!(clamp_upload_limit(4096), 4096);
        assert_eq!(clamp_upload_limit(usize::MAX), daemon::MAX_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_precision_tiers_are_ordered() {
        assert!(thermometer::ULTRA_PRECISE_MAX_STD_DEV < thermometer::VERY_PRECISE_MAX_STD_DEV);
        assert_eq!(grammar::TIMESTAMP_LEN, "2007-04-05T22:00".len());
    }
}
