//! display helpers

use crate::rng::RandomSource;

/// p-th percentile (0..=100) with linear interpolation between order statistics
///
/// `None` for an empty slice; p outside 0..=100 is clamped.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let p = p.clamp(0.0, 100.0);
    let index = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    let weight = index % 1.0;

    if lower == upper {
        return Some(sorted[lower]);
    }
    Some(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
}

/// fixed decimal rendering, e.g. p-values in tables
pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// uniform draw in [min, max)
pub fn random_between(rng: &mut RandomSource, min: f64, max: f64) -> f64 {
    rng.next_f64() * (max - min) + min
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_percentile() {
        let values = [5.0, 1.0, 3.0, 2.0, 4.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 50.0), Some(3.0));
        assert_eq!(percentile(&values, 100.0), Some(5.0));
        assert_relative_eq!(percentile(&values, 10.0).unwrap(), 1.4, epsilon = 1e-12);
        assert_relative_eq!(percentile(&[1.0, 2.0], 75.0).unwrap(), 1.75, epsilon = 1e-12);
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[7.0], 90.0), Some(7.0));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.123456, 3), "0.123");
        assert_eq!(format_number(2.0, 2), "2.00");
        assert_eq!(format_number(1.5, 0), "2");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(57.6, 0), 58.0);
        assert_eq!(round_to(0.0, 2), 0.0);
    }

    #[test]
    fn test_random_between() {
        let mut rng = RandomSource::seeded(9);
        for _ in 0..100 {
            let x = random_between(&mut rng, -2.0, 2.0);
            assert!((-2.0..2.0).contains(&x));
        }
    }
}
