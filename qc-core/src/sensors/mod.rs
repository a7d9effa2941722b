//! Sensor classification rules and their registry
//!
//! Each supported sensor type has one pure classification function in its own
//! module. The registry ties a type name to the reference attribute it is
//! judged against and to that function.

mod humidistat;
mod registry;
mod thermometer;

use serde::Serialize;
use std::fmt;

pub use humidistat::classify_humidistat;
pub use registry::{find_classifier, lookup, supported_sensor_types, SensorClassifier, SENSOR_CLASSIFIERS};
pub use thermometer::classify_thermometer;

/// Reliability label assigned to a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Label {
    #[serde(rename = "not enough values")]
    NotEnoughValues,
    #[serde(rename = "ultra precise")]
    UltraPrecise,
    #[serde(rename = "very precise")]
    VeryPrecise,
    #[serde(rename = "precise")]
    Precise,
    #[serde(rename = "keep")]
    Keep,
    #[serde(rename = "discard")]
    Discard,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::NotEnoughValues => "not enough values",
            Label::UltraPrecise => "ultra precise",
            Label::VeryPrecise => "very precise",
            Label::Precise => "precise",
            Label::Keep => "keep",
            Label::Discard => "discard",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_display_matches_serde() {
        for label in [
            Label::NotEnoughValues,
            Label::UltraPrecise,
            Label::VeryPrecise,
            Label::Precise,
            Label::Keep,
            Label::Discard,
        ] {
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label));
        }
    }
}
