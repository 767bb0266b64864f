//! Score normalization
//!
//! This module maps raw daily averages onto the 0-100 scales used by the health score.
//! - Linear band and reference scaling with clamping
//! - Hydration scale detection
//! - Integer score rounding

/// Upper bound of every score
pub const MAX_SCORE: f64 = 100.0;

/// Hydration averages at or below this value are treated as a 0-10 scale
pub const HYDRATION_TEN_POINT_MAX: f64 = 10.0;

/// Scale `value` linearly from the band `[floor, ceiling]` onto 0-100, clamped
pub fn scale_band(value: f64, floor: f64, ceiling: f64) -> f64 {
    let span = ceiling - floor;
    if span <= 0.0 {
        return 0.0;
    }
    ((value - floor) / span * MAX_SCORE).clamp(0.0, MAX_SCORE)
}

/// Scale `value` against a reference that maps to 100, clamped to 0-100
pub fn scale_reference(value: f64, reference: f64) -> f64 {
    if reference <= 0.0 {
        return 0.0;
    }
    (value / reference * MAX_SCORE).clamp(0.0, MAX_SCORE)
}

/// Normalize an average hydration score to 0-100.
///
/// Producers disagree on the hydration range: some report 0-10, others 0-100.
/// An average of at most 10 is read as the 0-10 scale and multiplied by 10;
/// anything above is taken as already on 0-100. A genuine 0-100 average of 10
/// or less is therefore inflated tenfold, which is the known cost of this rule.
pub fn normalize_hydration(average: f64) -> f64 {
    let scaled = if average <= HYDRATION_TEN_POINT_MAX {
        average * 10.0
    } else {
        average
    };
    scaled.clamp(0.0, MAX_SCORE)
}

/// Clamp to 0-100 and round to the nearest integer
pub fn to_score(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.clamp(0.0, MAX_SCORE).round() as u8
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of the non-zero scores; 0 when every score is zero
pub fn mean_of_nonzero(scores: &[u8]) -> f64 {
    let nonzero: Vec<f64> = scores
        .iter()
        .filter(|&&score| score > 0)
        .map(|&score| score as f64)
        .collect();
    mean(&nonzero).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_band() {
        assert!((scale_band(2000.0, 1200.0, 2500.0) - 61.538).abs() < 0.001);
        assert_eq!(scale_band(800.0, 1200.0, 2500.0), 0.0);
        assert_eq!(scale_band(10_000.0, 1200.0, 2500.0), 100.0);
        assert_eq!(scale_band(2000.0, 2500.0, 1200.0), 0.0);
    }

    #[test]
    fn test_scale_reference() {
        assert_eq!(scale_reference(1000.0, 2000.0), 50.0);
        assert_eq!(scale_reference(120.0, 100.0), 100.0);
        assert_eq!(scale_reference(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_hydration_ten_point_scale() {
        assert_eq!(normalize_hydration(7.5), 75.0);
        assert_eq!(normalize_hydration(10.0), 100.0);
    }

    #[test]
    fn test_hydration_hundred_point_scale() {
        assert_eq!(normalize_hydration(10.5), 10.5);
        assert_eq!(normalize_hydration(85.0), 85.0);
        assert_eq!(normalize_hydration(250.0), 100.0);
    }

    #[test]
    fn test_to_score() {
        assert_eq!(to_score(42.857), 43);
        assert_eq!(to_score(-3.0), 0);
        assert_eq!(to_score(140.0), 100);
        assert_eq!(to_score(f64::NAN), 0);
    }

    #[test]
    fn test_mean_of_nonzero() {
        assert_eq!(mean_of_nonzero(&[80, 0, 60, 0, 100]), 80.0);
        assert_eq!(mean_of_nonzero(&[0, 0]), 0.0);
        assert_eq!(mean_of_nonzero(&[]), 0.0);
    }
}
