//! Line-oriented parser for sensor logs
//!
//! # Grammar
//!
//! ```text
//! reference 70.0 45.0          <- line 0 only: reference temperature and humidity
//! thermometer temp-1           <- sensor header: starts a sensor context
//! 2007-04-05T22:00 72.4        <- reading for the current sensor
//! humidistat hum-1
//! 2007-04-05T22:04 45.2
//! ```
//!
//! Each line is classified on its own into a [`LogLine`], then folded into a
//! [`ParseState`] that carries the log under construction and the name of the
//! current sensor. Any two-token line that is neither a header nor a reading
//! clears the current sensor, so readings after it are dropped until the next
//! header. Lines with any other token count are ignored.
//!
//! Only a three-token line 0 is a reference line. A line 0 of any other shape,
//! `reference 70.0 45.0 12` included, goes through the ordinary rules and the
//! log ends up without a reference.

use tracing::{debug, error, info, warn};

use qc_error::{QControllerError, Result};

use crate::constants::grammar;
use crate::data::{
    is_timestamp, parse_reading_value, split_lines, tokenize, ParsedLog, ReferenceRecord,
};
use crate::sensors;

/// One tokenized log line
#[derive(Debug, Clone, PartialEq)]
enum LogLine<'a> {
    Reference(ReferenceRecord),
    SensorHeader { sensor_type: &'a str, name: &'a str },
    Reading { timestamp: &'a str, value: &'a str },
    Unrecognized { first: &'a str, second: &'a str },
    Ignored,
}

impl<'a> LogLine<'a> {
    fn classify(index: usize, tokens: &[&'a str]) -> Result<Self> {
        if index == 0 {
            if let &[grammar::REFERENCE_KEYWORD, temperature, humidity] = tokens {
                return parse_reference(index, temperature, humidity).map(LogLine::Reference);
            }
        }

        if tokens.len() != grammar::PAIR_LINE_TOKENS {
            return Ok(LogLine::Ignored);
        }

        let (first, second) = (tokens[0], tokens[1]);
        let line = if sensors::lookup(first).is_some() {
            LogLine::SensorHeader { sensor_type: first, name: second }
        } else if is_timestamp(first) {
            LogLine::Reading { timestamp: first, value: second }
        } else {
            LogLine::Unrecognized { first, second }
        };
        Ok(line)
    }
}

fn parse_reference(index: usize, temperature: &str, humidity: &str) -> Result<ReferenceRecord> {
    let parse = |name: &str, token: &str| {
        parse_reading_value(token).ok_or_else(|| {
            error!("Invalid reference {}: {}", name, token);
            QControllerError::malformed(index, format!("invalid reference {} '{}'", name, token))
        })
    };

    Ok(ReferenceRecord::new(
        parse("temperature", temperature)?,
        parse("humidity", humidity)?,
    ))
}

/// Fold accumulator: the log so far plus the active sensor context
#[derive(Debug, Default)]
struct ParseState {
    log: ParsedLog,
    current_sensor: Option<String>,
}

impl ParseState {
    fn apply(mut self, line: LogLine<'_>) -> Self {
        match line {
            LogLine::Reference(reference) => {
                info!(
                    "Reference values found: temperature={:?}, humidity={:?}",
                    reference.temperature, reference.humidity
                );
                self.log.reference = reference;
            }
            LogLine::SensorHeader { sensor_type, name } => {
                info!("Sensor data found: {} {}", sensor_type, name);
                self.log.declare_sensor(name, sensor_type);
                self.current_sensor = Some(name.to_string());
            }
            LogLine::Reading { timestamp, value } => match &self.current_sensor {
                Some(sensor) => match parse_reading_value(value) {
                    Some(reading) => {
                        self.log.push_reading(sensor, reading);
                        debug!("Found value for sensor {} at {}: {}", sensor, timestamp, reading);
                    }
                    None => warn!("Invalid value for {}: {}", sensor, value),
                },
                None => debug!("Reading at {} has no active sensor, ignoring", timestamp),
            },
            LogLine::Unrecognized { first, second } => {
                warn!("Unknown sensor type or invalid line: {} {}", first, second);
                self.current_sensor = None;
            }
            LogLine::Ignored => {}
        }
        self
    }

    fn finish(self) -> Result<ParsedLog> {
        if !self.log.reference.is_complete() {
            error!("Reference data is missing");
            return Err(QControllerError::MissingReference);
        }
        Ok(self.log)
    }
}

/// Parse raw log text into a [`ParsedLog`]
///
/// # Errors
/// - `EmptyInput` if the content has no non-blank characters
/// - `MalformedLog` if line 0 is `reference <a> <b>` and either value is
///   not a number
/// - `MissingReference` if no reference line was found
pub fn parse_log(content: &str) -> Result<ParsedLog> {
    info!("Parsing log content...");

    let content = content.trim();
    if content.is_empty() {
        error!("Log file is empty");
        return Err(QControllerError::EmptyInput);
    }

    split_lines(content)
        .enumerate()
        .try_fold(ParseState::default(), |state, (index, line)| {
            let tokens = tokenize(line);
            LogLine::classify(index, &tokens).map(|parsed| state.apply(parsed))
        })?
        .finish()
}
