//! Correlation analysis
//!
//! Pearson correlation between metric series drawn from the daily records and
//! the weight history, with per-pair strength classification.

use crate::config::{CorrelationConfig, Thresholds};
use crate::types::{
    CorrelationDirection, CorrelationResult, DailyMetricRecord, MetricPair, Significance,
    WeightSample,
};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Correlation engine over one user's window
pub struct CorrelationEngine;

impl CorrelationEngine {
    /// Compute every configured metric pair, in [`MetricPair::ALL`] order.
    ///
    /// `records` and `weights` are expected in ascending date order.
    pub fn analyze(
        records: &[DailyMetricRecord],
        weights: &[WeightSample],
        config: &CorrelationConfig,
    ) -> Vec<CorrelationResult> {
        MetricPair::ALL
            .iter()
            .map(|&pair| {
                let (xs, ys) = series_for_pair(pair, records, weights);
                let r = pearson(&xs, &ys);
                let sample_size = xs.len().min(ys.len());
                tracing::trace!(?pair, r, sample_size, "computed correlation");
                build_result(pair, r, sample_size, config.thresholds_for(pair))
            })
            .collect()
    }
}

fn build_result(
    pair: MetricPair,
    r: f64,
    sample_size: usize,
    thresholds: Thresholds,
) -> CorrelationResult {
    let (metric1, metric2) = pair.metrics();
    CorrelationResult {
        pair,
        metric1,
        metric2,
        correlation: r,
        significance: classify(r, thresholds),
        direction: direction(r),
        sample_size,
    }
}

/// Extract the two series for a pair
fn series_for_pair(
    pair: MetricPair,
    records: &[DailyMetricRecord],
    weights: &[WeightSample],
) -> (Vec<f64>, Vec<f64>) {
    match pair {
        MetricPair::WeightCalories => {
            let weight_series: Vec<(NaiveDate, f64)> =
                weights.iter().map(|w| (w.date, w.weight)).collect();
            let calorie_series: Vec<(NaiveDate, f64)> =
                records.iter().map(|r| (r.date, r.total_calories)).collect();
            align_by_date(&weight_series, &calorie_series)
        }
        MetricPair::SleepTraining => (
            records.iter().map(|r| r.sleep_score).collect(),
            records.iter().map(|r| r.workout_volume).collect(),
        ),
        // Energy is not logged directly; sleep score stands in for it
        MetricPair::HydrationEnergy => (
            records.iter().map(|r| r.hydration_score).collect(),
            records.iter().map(|r| r.sleep_score).collect(),
        ),
        MetricPair::ProteinTraining => (
            records.iter().map(|r| r.total_protein).collect(),
            records.iter().map(|r| r.workout_volume).collect(),
        ),
    }
}

/// Pair two dated series on matching dates.
///
/// Dates present in only one series are dropped. Output follows the order of `a`;
/// if `b` repeats a date, its last value wins.
pub fn align_by_date(a: &[(NaiveDate, f64)], b: &[(NaiveDate, f64)]) -> (Vec<f64>, Vec<f64>) {
    let lookup: HashMap<NaiveDate, f64> = b.iter().copied().collect();
    a.iter()
        .filter_map(|(date, x)| lookup.get(date).map(|y| (*x, *y)))
        .unzip()
}

/// Pearson correlation coefficient.
///
/// Series are paired positionally over the shorter length. Fewer than two points
/// or a constant series yields 0.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }

    let (xs, ys) = (&xs[..n], &ys[..n]);
    // Checked exactly: a constant series leaves rounding residue in its variance
    if is_constant(xs) || is_constant(ys) {
        return 0.0;
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut covariance, mut variance_x, mut variance_y) = (0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    let denominator = (variance_x * variance_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    (covariance / denominator).clamp(-1.0, 1.0)
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

/// Classify |r| against a pair's thresholds
pub fn classify(r: f64, thresholds: Thresholds) -> Significance {
    let magnitude = r.abs();
    if magnitude > thresholds.strong {
        Significance::Strong
    } else if magnitude > thresholds.moderate {
        Significance::Moderate
    } else {
        Significance::Weak
    }
}

pub fn direction(r: f64) -> CorrelationDirection {
    if r > 0.0 {
        CorrelationDirection::Positive
    } else if r < 0.0 {
        CorrelationDirection::Negative
    } else {
        CorrelationDirection::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn record(
        day: u32,
        calories: f64,
        protein: f64,
        volume: f64,
        sleep: f64,
        hydration: f64,
    ) -> DailyMetricRecord {
        DailyMetricRecord {
            total_calories: calories,
            total_protein: protein,
            workout_volume: volume,
            sleep_score: sleep,
            hydration_score: hydration,
            ..DailyMetricRecord::empty(date(day))
        }
    }

    #[test]
    fn test_perfect_positive_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x).collect();
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_negative_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&xs, &ys) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_series_yield_zero() {
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
        assert_eq!(pearson(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn test_constant_non_dyadic_series_yield_zero() {
        let varying = [6.0, 7.0, 8.0, 5.0, 9.0, 6.5, 7.5];
        for constant in [0.1, 1.1, 7.3, 8.9] {
            let flat = [constant; 7];
            assert_eq!(pearson(&flat, &varying), 0.0);
            assert_eq!(pearson(&varying, &flat), 0.0);
            assert_eq!(direction(pearson(&flat, &varying)), CorrelationDirection::Neutral);
        }
    }

    #[test]
    fn test_constant_hydration_is_neutral() {
        let records: Vec<DailyMetricRecord> = (1..=7)
            .map(|day| record(day, 2000.0, 100.0, 1000.0, 5.0 + day as f64 * 0.5, 7.3))
            .collect();

        let results = CorrelationEngine::analyze(&records, &[], &CorrelationConfig::default());
        let hydration_energy = results
            .iter()
            .find(|r| r.pair == MetricPair::HydrationEnergy)
            .unwrap();
        assert_eq!(hydration_energy.correlation, 0.0);
        assert_eq!(hydration_energy.direction, CorrelationDirection::Neutral);
        assert_eq!(hydration_energy.significance, Significance::Weak);
    }

    #[test]
    fn test_unequal_lengths_pair_positionally() {
        let r = pearson(&[1.0, 2.0, 3.0, 100.0], &[2.0, 4.0, 6.0]);
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetry_and_bounds() {
        let series = [
            vec![1.0, 5.0, 2.0, 8.0, 3.0, 9.0],
            vec![10.0, 4.0, 7.0, 1.0, 6.0, 2.0],
            vec![0.5, 0.5, 0.7, 0.1, 0.9, 0.3],
            vec![1e6, 2e6, 1.5e6, 3e6, 2.5e6, 1e6],
        ];
        for a in &series {
            for b in &series {
                let ab = pearson(a, b);
                let ba = pearson(b, a);
                assert!((-1.0..=1.0).contains(&ab));
                assert!((ab - ba).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_align_by_date_drops_unmatched() {
        let a = vec![(date(1), 80.0), (date(2), 79.5), (date(4), 79.0)];
        let b = vec![(date(2), 2100.0), (date(3), 1900.0), (date(4), 1800.0)];
        let (xs, ys) = align_by_date(&a, &b);
        assert_eq!(xs, vec![79.5, 79.0]);
        assert_eq!(ys, vec![2100.0, 1800.0]);
    }

    #[test]
    fn test_per_pair_thresholds() {
        // 0.65 is strong for sleep/training (0.6) but only moderate for weight/calories (0.7)
        let config = CorrelationConfig::default();
        assert_eq!(
            classify(0.65, config.thresholds_for(MetricPair::SleepTraining)),
            Significance::Strong
        );
        assert_eq!(
            classify(-0.65, config.thresholds_for(MetricPair::WeightCalories)),
            Significance::Moderate
        );
        assert_eq!(
            classify(0.55, config.thresholds_for(MetricPair::HydrationEnergy)),
            Significance::Strong
        );
        assert_eq!(
            classify(0.2, config.thresholds_for(MetricPair::ProteinTraining)),
            Significance::Weak
        );
    }

    #[test]
    fn test_direction() {
        assert_eq!(direction(0.3), CorrelationDirection::Positive);
        assert_eq!(direction(-0.3), CorrelationDirection::Negative);
        assert_eq!(direction(0.0), CorrelationDirection::Neutral);
    }

    #[test]
    fn test_analyze_all_pairs() {
        let records = vec![
            record(1, 1800.0, 100.0, 1000.0, 6.0, 5.0),
            record(2, 2000.0, 120.0, 2000.0, 7.0, 6.0),
            record(3, 2200.0, 140.0, 3000.0, 8.0, 7.0),
            record(4, 2400.0, 160.0, 4000.0, 9.0, 8.0),
        ];
        let weights: Vec<WeightSample> = [(1, 80.0), (3, 80.4), (4, 80.6)]
            .into_iter()
            .map(|(day, weight)| WeightSample {
                date: date(day),
                weight,
                body_fat_percentage: None,
            })
            .collect();

        let results =
            CorrelationEngine::analyze(&records, &weights, &CorrelationConfig::default());
        assert_eq!(results.len(), 4);

        let weight_calories = &results[0];
        assert_eq!(weight_calories.pair, MetricPair::WeightCalories);
        assert_eq!(weight_calories.sample_size, 3);
        assert_eq!(weight_calories.direction, CorrelationDirection::Positive);

        for result in &results[1..] {
            assert!((result.correlation - 1.0).abs() < 1e-9);
            assert_eq!(result.significance, Significance::Strong);
            assert_eq!(result.sample_size, 4);
        }
    }

    #[test]
    fn test_analyze_empty_input() {
        let results = CorrelationEngine::analyze(&[], &[], &CorrelationConfig::default());
        assert!(results.iter().all(|r| r.correlation == 0.0
            && r.significance == Significance::Weak
            && r.direction == CorrelationDirection::Neutral));
    }
}
