//! Static registry of supported sensor types
//!
//! Adding a sensor type means adding one entry to `SENSOR_CLASSIFIERS` along
//! with its classification function. The parser and the evaluator both read
//! this table and need no other change.

use std::fmt;

use super::{classify_humidistat, classify_thermometer, Label};
use crate::data::ReferenceAttribute;

/// Registry entry for one sensor type
#[derive(Clone, Copy)]
pub struct SensorClassifier {
    /// Type token used in sensor header lines (e.g. `thermometer`)
    pub sensor_type: &'static str,
    /// Reference value the readings are compared against
    pub reference: ReferenceAttribute,
    /// Classification rule: (readings, reference value) -> label
    pub classify: fn(&[f64], f64) -> Label,
    /// Every label `classify` can return
    pub labels: &'static [Label],
}

impl SensorClassifier {
    pub fn classify(&self, values: &[f64], reference_value: f64) -> Label {
        (self.classify)(values, reference_value)
    }
}

impl fmt::Debug for SensorClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorClassifier")
            .field("sensor_type", &self.sensor_type)
            .field("reference", &self.reference)
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

pub static SENSOR_CLASSIFIERS: &[SensorClassifier] = &[
    SensorClassifier {
        sensor_type: "thermometer",
        reference: ReferenceAttribute::Temperature,
        classify: classify_thermometer,
        labels: &[
            Label::NotEnoughValues,
            Label::UltraPrecise,
            Label::VeryPrecise,
            Label::Precise,
        ],
    },
    SensorClassifier {
        sensor_type: "humidistat",
        reference: ReferenceAttribute::Humidity,
        classify: classify_humidistat,
        labels: &[Label::NotEnoughValues, Label::Discard, Label::Keep],
    },
];

/// Find the classifier for a sensor type. Unsupported types yield `None`.
pub fn lookup(sensor_type: &str) -> Option<&'static SensorClassifier> {
    find_classifier(SENSOR_CLASSIFIERS, sensor_type)
}

/// Find the classifier for a sensor type in an arbitrary table
pub fn find_classifier<'a>(
    classifiers: &'a [SensorClassifier],
    sensor_type: &str,
) -> Option<&'a SensorClassifier> {
    classifiers.iter().find(|entry| entry.sensor_type == sensor_type)
}

/// Names of all supported sensor types, in registry order
pub fn supported_sensor_types() -> impl Iterator<Item = &'static str> {
    SENSOR_CLASSIFIERS.iter().map(|entry| entry.sensor_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_supported() {
        let thermometer = lookup("thermometer").unwrap();
        assert_eq!(thermometer.reference, ReferenceAttribute::Temperature);
        let humidistat = lookup("humidistat").unwrap();
        assert_eq!(humidistat.reference, ReferenceAttribute::Humidity);
    }

    #[test]
    fn test_lookup_unsupported_is_none() {
        assert!(lookup("barometer").is_none());
        assert!(lookup("Thermometer").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_supported_types() {
        let types: Vec<&str> = supported_sensor_types().collect();
        assert_eq!(types, vec!["thermometer", "humidistat"]);
    }

    #[test]
    fn test_entries_dispatch_to_their_rule() {
        let humidistat = lookup("humidistat").unwrap();
        assert_eq!(humidistat.classify(&[45.2], 45.0), Label::Keep);
        let thermometer = lookup("thermometer").unwrap();
        assert_eq!(thermometer.classify(&[70.0], 70.0), Label::NotEnoughValues);
    }

    #[test]
    fn test_type_names_are_unique() {
        for (i, a) in SENSOR_CLASSIFIERS.iter().enumerate() {
            for b in &SENSOR_CLASSIFIERS[i + 1..] {
                assert_ne!(a.sensor_type, b.sensor_type);
            }
        }
    }
}
