//! Data types produced by parsing a sensor log
//!
//! Contains the reference record, sensor records and the parsed log aggregate.

mod types;
mod validation;

pub use types::{ParsedLog, ReferenceAttribute, ReferenceRecord, SensorRecord};
pub use validation::{is_timestamp, parse_reading_value, split_lines, tokenize};
