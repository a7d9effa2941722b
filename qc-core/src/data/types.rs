//! Core data types for QController
//!
//! Defines the structures produced by the log parser and consumed by the evaluator.

use std::collections::HashMap;
use std::fmt;

use crate::constants::reference;

/// Reference attribute a sensor type is judged against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceAttribute {
    Temperature,
    Humidity,
}

impl ReferenceAttribute {
    pub fn name(&self) -> &'static str {
        match self {
            ReferenceAttribute::Temperature => reference::TEMPERATURE,
            ReferenceAttribute::Humidity => reference::HUMIDITY,
        }
    }
}

impl fmt::Display for ReferenceAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trusted baseline values from the `reference` line
///
/// Both fields are `Some` in any log returned by the parser.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReferenceRecord {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

impl ReferenceRecord {
    pub fn new(temperature: f64, humidity: f64) -> Self {
        Self {
            temperature: Some(temperature),
            humidity: Some(humidity),
        }
    }

    pub fn get(&self, attribute: ReferenceAttribute) -> Option<f64> {
        match attribute {
            ReferenceAttribute::Temperature => self.temperature,
            ReferenceAttribute::Humidity => self.humidity,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.temperature.is_some() && self.humidity.is_some()
    }
}

/// A named sensor and its readings in log order
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRecord {
    pub name: String,
    pub sensor_type: String,
    pub values: Vec<f64>,
}

impl SensorRecord {
    pub fn new(name: impl Into<String>, sensor_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sensor_type: sensor_type.into(),
            values: Vec::new(),
        }
    }
}

/// Structured form of one uploaded log
///
/// Sensors iterate in first-declaration order. Re-declaring a name resets
/// its entry in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    pub reference: ReferenceRecord,
    sensors: Vec<SensorRecord>,
    index: HashMap<String, usize>,
}

impl ParsedLog {
    pub fn new(reference: ReferenceRecord) -> Self {
        Self {
            reference,
            ..Self::default()
        }
    }

    /// Start (or restart) the entry for `name` with an empty values list
    pub fn declare_sensor(&mut self, name: &str, sensor_type: &str) {
        let record = SensorRecord::new(name, sensor_type);
        match self.index.get(name) {
            Some(&position) => self.sensors[position] = record,
            None => {
                self.index.insert(name.to_string(), self.sensors.len());
                self.sensors.push(record);
            }
        }
    }

    /// Append a reading to a declared sensor. Returns false if `name` is unknown.
    pub fn push_reading(&mut self, name: &str, value: f64) -> bool {
        match self.index.get(name) {
            Some(&position) => {
                self.sensors[position].values.push(value);
                true
            }
            None => false,
        }
    }

    pub fn sensor(&self, name: &str) -> Option<&SensorRecord> {
        self.index.get(name).map(|&position| &self.sensors[position])
    }

    pub fn sensors(&self) -> impl Iterator<Item = &SensorRecord> {
        self.sensors.iter()
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_lookup() {
        let reference = ReferenceRecord::new(70.0, 45.0);
        assert_eq!(reference.get(ReferenceAttribute::Temperature), Some(70.0));
        assert_eq!(reference.get(ReferenceAttribute::Humidity), Some(45.0));
        assert!(reference.is_complete());
        assert!(!ReferenceRecord::default().is_complete());
    }

    #[test]
    fn test_redeclare_keeps_position_and_resets_values() {
        let mut log = ParsedLog::default();
        log.declare_sensor("temp-1", "thermometer");
        log.declare_sensor("hum-1", "humidistat");
        assert!(log.push_reading("temp-1", 70.1));

        log.declare_sensor("temp-1", "humidistat");

        let names: Vec<&str> = log.sensors().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["temp-1", "hum-1"]);
        let temp = log.sensor("temp-1").unwrap();
        assert_eq!(temp.sensor_type, "humidistat");
        assert!(temp.values.is_empty());
    }

    #[test]
    fn test_push_reading_unknown_sensor() {
        let mut log = ParsedLog::default();
        assert!(!log.push_reading("ghost", 1.0));
        assert_eq!(log.sensor_count(), 0);
    }
}
