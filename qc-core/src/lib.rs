//! QController Core Library
//!
//! Parses sensor logs and classifies each sensor's reliability against the
//! reference conditions recorded at the top of the log.
//!
//! # Module Structure
//!
//! - `data/` - Parsed log types and token validation
//! - `engine/` - Log parser and sensor evaluator
//! - `sensors/` - Classification rules and the sensor type registry
//!
//! # Example
//!
//! ```
//! use qc_core::{evaluate_log, Label};
//!
//! let report = evaluate_log(
//!     "reference 70.0 45.0\n\
//!      humidistat hum-1\n\
//!      2007-04-05T22:04 45.2\n",
//! )
//! .unwrap();
//! assert_eq!(report.get("hum-1"), Some(Label::Keep));
//! ```

// Grouped modules
pub mod data;
pub mod engine;
pub mod sensors;

// Standalone modules
pub mod constants;

// Re-export primary types from data/
pub use data::{ParsedLog, ReferenceAttribute, ReferenceRecord, SensorRecord};

// Re-export engine entry points
pub use engine::{
    evaluate_log, evaluate_sensors, evaluate_with, parse_log, ClassificationReport,
    SensorClassification,
};

// Re-export classification rules and registry
pub use sensors::{
    classify_humidistat, classify_thermometer, lookup, supported_sensor_types, Label,
    SensorClassifier, SENSOR_CLASSIFIERS,
};

// Re-export error types
pub use qc_error::{QControllerError, Result};
