//! Unified error handling for QController
//!
//! This crate provides a single error type used across all QController components.
//! It uses thiserror for ergonomic error definitions with proper Display and Error trait impls.
//!
//! Errors are split into two families:
//! - **client errors**: the uploaded log (or the upload itself) is unusable.
//!   The daemon answers these with a 4xx status and the `detail()` text.
//! - **internal errors**: anything else. The daemon answers with 500.

use std::io;

/// Result type alias using QControllerError
pub type Result<T> = std::result::Result<T, QControllerError>;

/// Unified error type for all QController operations
#[derive(thiserror::Error, Debug)]
pub enum QControllerError {
    // ============================================================================
    // Log Input Errors
    // ============================================================================
    #[error("Log file is empty")]
    EmptyInput,

    #[error("Invalid log format (line {line}: {reason})")]
    MalformedLog {
        line: usize,
        reason: String,
    },

    #[error("Reference data is missing")]
    MissingReference,

    // ============================================================================
    // Evaluation Errors
    // ============================================================================
    #[error("Reference attribute '{attribute}' required by sensor {sensor} is missing")]
    MissingReferenceAttribute {
        sensor: String,
        attribute: String,
    },

    /// Diagnostic only: the evaluator logs this and skips the sensor.
    #[error("Unsupported sensor type: {sensor_type} for sensor {sensor}")]
    UnsupportedSensorType {
        sensor: String,
        sensor_type: String,
    },

    // ============================================================================
    // Upload Errors
    // ============================================================================
    #[error("File must be a .log file")]
    InvalidFileType(String),

    #[error("No file was uploaded (expected multipart field '{0}')")]
    MissingUpload(String),

    #[error("Log file is not valid UTF-8")]
    InvalidEncoding,

    #[error("Upload too large: {size} bytes (max {max_size} bytes)")]
    UploadTooLarge {
        size: usize,
        max_size: usize,
    },

    #[error("Invalid multipart request: {0}")]
    InvalidMultipart(String),

    // ============================================================================
    // Infrastructure Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Generic(String),
}

impl QControllerError {
    /// Create a generic error from a string
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }

    /// Create a config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a malformed log error for a 0-based line index
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLog {
            line: line + 1,
            reason: reason.into(),
        }
    }

    /// Create a multipart error from a string
    pub fn multipart(msg: impl Into<String>) -> Self {
        Self::InvalidMultipart(msg.into())
    }

    /// Whether the failure was caused by the client's input rather than by the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput
                | Self::MalformedLog { .. }
                | Self::MissingReference
                | Self::InvalidFileType(_)
                | Self::MissingUpload(_)
                | Self::InvalidEncoding
                | Self::UploadTooLarge { .. }
                | Self::InvalidMultipart(_)
        )
    }

    /// Message returned to HTTP clients
    ///
    /// Input-shape failures keep the short messages clients already rely on.
    /// Internal failures are prefixed so they are recognisable in responses.
    pub fn detail(&self) -> String {
        match self {
            Self::MalformedLog { .. } => "Invalid log format".to_string(),
            e if e.is_client_error() => e.to_string(),
            e => format!("Internal Server Error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(QControllerError::EmptyInput.is_client_error());
        assert!(QControllerError::MissingReference.is_client_error());
        assert!(QControllerError::malformed(0, "bad").is_client_error());
        assert!(QControllerError::InvalidFileType("a.txt".into()).is_client_error());
    }

    #[test]
    fn test_internal_errors() {
        let err = QControllerError::MissingReferenceAttribute {
            sensor: "temp-1".into(),
            attribute: "temperature".into(),
        };
        assert!(!err.is_client_error());
        assert!(err.detail().starts_with("Internal Server Error: "));
        assert!(!QControllerError::generic("boom").is_client_error());
    }

    #[test]
    fn test_detail_messages() {
        assert_eq!(QControllerError::EmptyInput.detail(), "Log file is empty");
        assert_eq!(QControllerError::MissingReference.detail(), "Reference data is missing");
        assert_eq!(QControllerError::malformed(0, "expected 3 tokens").detail(), "Invalid log format");
        assert_eq!(
            QControllerError::InvalidFileType("notes.txt".into()).detail(),
            "File must be a .log file"
        );
    }

    #[test]
    fn test_malformed_line_is_one_based() {
        let err = QControllerError::malformed(0, "bad reference");
        assert_eq!(err.to_string(), "Invalid log format (line 1: bad reference)");
    }
}
