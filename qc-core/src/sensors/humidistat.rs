use tracing::warn;

use super::Label;
use crate::constants::humidistat::{MAX_DEVIATION, MIN_READINGS};

/// Classify a humidistat against the reference humidity
///
/// A single reading further than `MAX_DEVIATION` from the reference discards
/// the sensor; readings exactly at the bound are kept.
pub fn classify_humidistat(values: &[f64], reference_humidity: f64) -> Label {
    if values.len() < MIN_READINGS {
        warn!("Not enough values to classify the humidistat");
        return Label::NotEnoughValues;
    }

    if values
        .iter()
        .any(|value| (value - reference_humidity).abs() > MAX_DEVIATION)
    {
        Label::Discard
    } else {
        Label::Keep
    }
}
