//! Log evaluation engine
//!
//! Parsing turns raw log text into a [`ParsedLog`](crate::data::ParsedLog);
//! evaluation classifies every supported sensor in it.

mod evaluator;
mod parser;

pub use evaluator::{evaluate_sensors, evaluate_with, ClassificationReport, SensorClassification};
pub use parser::parse_log;

use qc_error::Result;

/// Parse `content` and classify its sensors in one step
pub fn evaluate_log(content: &str) -> Result<ClassificationReport> {
    let log = parse_log(content)?;
    evaluate_sensors(&log)
}
