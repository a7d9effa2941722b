use tracing::warn;

use super::Label;
use crate::constants::thermometer::{
    MAX_MEAN_DEVIATION, MIN_READINGS, ULTRA_PRECISE_MAX_STD_DEV, VERY_PRECISE_MAX_STD_DEV,
};

/// Classify a thermometer against the reference temperature
///
/// The mean of the readings must sit within `MAX_MEAN_DEVIATION` of the
/// reference for either of the two top tiers; the sample standard deviation
/// then picks the tier. Everything else is "precise".
pub fn classify_thermometer(values: &[f64], reference_temperature: f64) -> Label {
    // Sample standard deviation is undefined below two points
    if values.len() < MIN_READINGS {
        warn!("Not enough values to classify the thermometer");
        return Label::NotEnoughValues;
    }

    let avg = mean(values);
    let std = sample_std_dev(values, avg);
    let diff = (avg - reference_temperature).abs();

    if diff <= MAX_MEAN_DEVIATION && std < ULTRA_PRECISE_MAX_STD_DEV {
        Label::UltraPrecise
    } else if diff <= MAX_MEAN_DEVIATION && std < VERY_PRECISE_MAX_STD_DEV {
        Label::VeryPrecise
    } else {
        Label::Precise
    }
}

/// Correctly rounded sum of `values` (Shewchuk's exact partials)
///
/// Non-finite inputs fall back to plain addition so `inf`/`NaN` propagate.
fn exact_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut partials: Vec<f64> = Vec::new();
    let mut special = 0.0;

    for mut x in values {
        if !x.is_finite() {
            special += x;
            continue;
        }
        let mut kept = 0;
        for j in 0..partials.len() {
            let mut y = partials[j];
            if x.abs() < y.abs() {
                std::mem::swap(&mut x, &mut y);
            }
            let hi = x + y;
            let lo = y - (hi - x);
            if lo != 0.0 {
                partials[kept] = lo;
                kept += 1;
            }
            x = hi;
        }
        partials.truncate(kept);
        partials.push(x);
    }

    if special != 0.0 {
        return special;
    }

    // Sum the partials from the top, then fix up a half-way rounding case
    let Some(mut n) = partials.len().checked_sub(1) else {
        return 0.0;
    };
    let mut hi = partials[n];
    let mut lo = 0.0;
    while n > 0 {
        let x = hi;
        n -= 1;
        let y = partials[n];
        hi = x + y;
        lo = y - (hi - x);
        if lo != 0.0 {
            break;
        }
    }
    if n > 0 && ((lo < 0.0 && partials[n - 1] < 0.0) || (lo > 0.0 && partials[n - 1] > 0.0)) {
        let y = lo * 2.0;
        let x = hi + y;
        if y == x - hi {
            hi = x;
        }
    }
    hi
}

/// Arithmetic mean, correctly rounded
fn mean(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let approx = exact_sum(values.iter().copied()) / n;
    if !approx.is_finite() {
        return approx;
    }

    // approx * n == product + product_err exactly
    let product = approx * n;
    let product_err = approx.mul_add(n, -product);
    let residual = exact_sum(values.iter().copied().chain([-product, -product_err]));
    approx + residual / n
}

/// Bessel-corrected standard deviation. Callers guarantee `values.len() >= 2`.
fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    let squared = exact_sum(values.iter().map(|v| (v - mean).powi(2)));
    (squared / (values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [f64; 13] = [
        72.4, 76.0, 79.1, 75.6, 71.2, 71.4, 69.2, 65.2, 62.8, 61.4, 64.0, 67.5, 69.4,
    ];

    #[test]
    fn test_not_enough_values() {
        assert_eq!(classify_thermometer(&[], 70.0), Label::NotEnoughValues);
        assert_eq!(classify_thermometer(&[70.0], 70.0), Label::NotEnoughValues);
        assert_eq!(classify_thermometer(&[-40.0], 1000.0), Label::NotEnoughValues);
    }

    #[test]
    fn test_statistics() {
        assert!((mean(&SAMPLE) - 69.630_769).abs() < 1e-5);
        assert!((sample_std_dev(&SAMPLE, mean(&SAMPLE)) - 5.397_898).abs() < 1e-5);
        assert!((sample_std_dev(&[1.0, 3.0], 2.0) - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_sample_log_is_deterministic() {
        let first = classify_thermometer(&SAMPLE, 70.0);
        assert_eq!(first, Label::Precise);
        for _ in 0..10 {
            assert_eq!(classify_thermometer(&SAMPLE, 70.0), first);
        }
    }

    #[test]
    fn test_ultra_precise() {
        // mean 70.44, std ~0.90
        assert_eq!(classify_thermometer(&[69.5, 70.1, 71.3, 71.5, 69.8], 70.0), Label::UltraPrecise);
    }

    #[test]
    fn test_very_precise() {
        // mean 70.0, std 4.0
        assert_eq!(classify_thermometer(&[66.0, 70.0, 74.0], 70.0), Label::VeryPrecise);
    }

    #[test]
    fn test_mean_too_far_is_precise() {
        assert_eq!(classify_thermometer(&[71.0, 71.0], 70.0), Label::Precise);
    }

    #[test]
    fn test_mean_deviation_bound_is_inclusive() {
        assert_eq!(classify_thermometer(&[70.5, 70.5], 70.0), Label::UltraPrecise);
    }

    #[test]
    fn test_mean_is_correctly_rounded_at_bound() {
        // Left-to-right addition gives 69.96666666666668, one ulp high
        let readings = [69.2, 69.4, 70.3, 70.9, 70.2, 69.8];
        assert_eq!(mean(&readings), 69.966_666_666_666_67);
        assert_eq!(classify_thermometer(&readings, 69.466_666_666_666_67), Label::UltraPrecise);
    }

    #[test]
    fn test_exact_sum() {
        assert_eq!(exact_sum([0.1; 10]), 1.0);
        assert_eq!(exact_sum([1e100, 1.0, -1e100]), 1.0);
        assert_eq!(exact_sum([]), 0.0);
        assert_eq!(exact_sum([f64::INFINITY, 1.0]), f64::INFINITY);
        assert!(exact_sum([f64::INFINITY, f64::NEG_INFINITY]).is_nan());
    }

    #[test]
    fn test_non_finite_readings() {
        assert_eq!(classify_thermometer(&[70.0, f64::INFINITY], 70.0), Label::Precise);
        assert_eq!(classify_thermometer(&[70.0, f64::NAN], 70.0), Label::Precise);
        assert_eq!(classify_thermometer(&[70.0, 70.0], f64::NAN), Label::Precise);
    }
}
