//! Sensor evaluation
//!
//! Walks a parsed log in sensor order and classifies every sensor whose type
//! has a registry entry. Sensors of unsupported types are logged and left out
//! of the report.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{error, info, warn};

use qc_error::{QControllerError, Result};
use qc_protocol::EvaluationResponse;

use crate::data::ParsedLog;
use crate::sensors::{find_classifier, Label, SensorClassifier, SENSOR_CLASSIFIERS};

/// Label assigned to one sensor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorClassification {
    pub sensor: String,
    pub label: Label,
}

/// Ordered result of evaluating a log: sensor name -> label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationReport {
    entries: Vec<SensorClassification>,
}

impl ClassificationReport {
    pub fn get(&self, sensor: &str) -> Option<Label> {
        self.entries
            .iter()
            .find(|entry| entry.sensor == sensor)
            .map(|entry| entry.label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorClassification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ClassificationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.sensor, &entry.label)?;
        }
        map.end()
    }
}

impl From<ClassificationReport> for EvaluationResponse {
    fn from(report: ClassificationReport) -> Self {
        let mut response = EvaluationResponse::new();
        for entry in report.entries {
            response.insert(entry.sensor, entry.label.as_str());
        }
        response
    }
}

/// Classify every supported sensor in `log` using the built-in registry
pub fn evaluate_sensors(log: &ParsedLog) -> Result<ClassificationReport> {
    evaluate_with(log, SENSOR_CLASSIFIERS)
}

/// Classify every sensor in `log` against an explicit classifier table
///
/// # Errors
/// `MissingReferenceAttribute` if a classifier names a reference value the
/// log does not carry.
pub fn evaluate_with(log: &ParsedLog, classifiers: &[SensorClassifier]) -> Result<ClassificationReport> {
    let mut report = ClassificationReport::default();

    for sensor in log.sensors() {
        info!(
            "Evaluating sensor {} of type {} with values: {:?}",
            sensor.name, sensor.sensor_type, sensor.values
        );

        let Some(classifier) = find_classifier(classifiers, &sensor.sensor_type) else {
            let skipped = QControllerError::UnsupportedSensorType {
                sensor: sensor.name.clone(),
                sensor_type: sensor.sensor_type.clone(),
            };
            warn!("{}. Skipping.", skipped);
            continue;
        };

        let reference_value = log.reference.get(classifier.reference).ok_or_else(|| {
            error!(
                "Reference attribute {} missing while evaluating sensor {}",
                classifier.reference, sensor.name
            );
            QControllerError::MissingReferenceAttribute {
                sensor: sensor.name.clone(),
                attribute: classifier.reference.name().to_string(),
            }
        })?;

        let label = classifier.classify(&sensor.values, reference_value);
        info!("Sensor {} classified as: {}", sensor.name, label);

        report.entries.push(SensorClassification {
            sensor: sensor.name.clone(),
            label,
        });
    }

    Ok(report)
}
