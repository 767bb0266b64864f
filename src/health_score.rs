//! Health score calculation
//!
//! This module combines five sub-domains of the most recent week into a 0-100 score:
//! - Nutrition: calorie band adequacy and protein adequacy
//! - Training: average daily volume
//! - Recovery: average sleep score
//! - Hydration: average hydration score (dual-scale input)
//! - Consistency: share of days with meaningful logging
//!
//! The trend compares the current week with the week before it.

use crate::config::ScoringConfig;
use crate::normalizer::{
    mean, mean_of_nonzero, normalize_hydration, scale_band, scale_reference, to_score,
};
use crate::types::{days_before, DailyMetricRecord, HealthScore, HealthTrend};
use chrono::NaiveDate;

/// Days in a scoring window
pub const SCORE_WINDOW_DAYS: u64 = 7;

/// Health score calculator
pub struct HealthScoreCalculator;

impl HealthScoreCalculator {
    /// Score the 7 days ending at `as_of` and derive the trend against the 7 days before.
    ///
    /// A prior week without any records yields `Stable` rather than being scored as 0.
    pub fn calculate(
        records: &[DailyMetricRecord],
        as_of: NaiveDate,
        config: &ScoringConfig,
    ) -> HealthScore {
        let current_start = days_before(as_of, SCORE_WINDOW_DAYS);
        let prior_start = days_before(as_of, SCORE_WINDOW_DAYS * 2);

        let current = select_range(records, current_start, as_of);
        if current.is_empty() {
            return HealthScore::default();
        }

        let nutrition = nutrition_score(&current, config);
        let training = training_score(&current, config);
        let recovery = recovery_score(&current);
        let hydration = hydration_score(&current);
        let consistency = consistency_score(&current, config);

        let overall = to_score(mean_of_nonzero(&[
            nutrition,
            training,
            recovery,
            hydration,
            consistency,
        ]));

        let prior = select_range(records, prior_start, current_start);
        let trend = if prior.is_empty() {
            HealthTrend::Stable
        } else {
            // Only nutrition and training are recomputed for the previous week
            let prior_overall = mean_of_nonzero(&[
                nutrition_score(&prior, config),
                training_score(&prior, config),
            ]);
            classify_trend(overall as f64, prior_overall, config.trend_delta)
        };

        tracing::debug!(
            overall,
            nutrition,
            training,
            recovery,
            hydration,
            consistency,
            ?trend,
            days = current.len(),
            "computed health score"
        );

        HealthScore {
            overall,
            nutrition,
            training,
            recovery,
            hydration,
            consistency,
            trend,
        }
    }
}

/// Number of daily records in the 7 days ending at `as_of`
pub fn scored_days(records: &[DailyMetricRecord], as_of: NaiveDate) -> usize {
    select_range(records, days_before(as_of, SCORE_WINDOW_DAYS), as_of).len()
}

/// Records with `after < date <= until`
fn select_range(
    records: &[DailyMetricRecord],
    after: NaiveDate,
    until: NaiveDate,
) -> Vec<&DailyMetricRecord> {
    records
        .iter()
        .filter(|r| r.date > after && r.date <= until)
        .collect()
}

fn average_of(records: &[&DailyMetricRecord], field: impl Fn(&DailyMetricRecord) -> f64) -> f64 {
    let values: Vec<f64> = records.iter().map(|r| field(r)).collect();
    mean(&values).unwrap_or(0.0)
}

/// Average of the rounded calorie and protein scores
fn nutrition_score(records: &[&DailyMetricRecord], config: &ScoringConfig) -> u8 {
    let avg_calories = average_of(records, |r| r.total_calories);
    let avg_protein = average_of(records, |r| r.total_protein);

    let calorie_score = to_score(scale_band(
        avg_calories,
        config.calorie_floor,
        config.calorie_ceiling,
    ));
    let protein_score = to_score(scale_reference(avg_protein, config.protein_reference_g));

    to_score(((calorie_score as f64 + protein_score as f64) / 2.0).max(0.0))
}

fn training_score(records: &[&DailyMetricRecord], config: &ScoringConfig) -> u8 {
    let avg_volume = average_of(records, |r| r.workout_volume);
    to_score(scale_reference(avg_volume, config.volume_reference_kg))
}

/// Sleep score is 0-10
fn recovery_score(records: &[&DailyMetricRecord]) -> u8 {
    to_score(average_of(records, |r| r.sleep_score) * 10.0)
}

fn hydration_score(records: &[&DailyMetricRecord]) -> u8 {
    to_score(normalize_hydration(average_of(records, |r| r.hydration_score)))
}

/// Share of the 7 days with at least the configured kcal logged
fn consistency_score(records: &[&DailyMetricRecord], config: &ScoringConfig) -> u8 {
    let logged_days = records
        .iter()
        .filter(|r| r.total_calories >= config.consistency_min_calories)
        .count();
    to_score(logged_days as f64 / SCORE_WINDOW_DAYS as f64 * 100.0)
}

fn classify_trend(current: f64, prior: f64, delta: f64) -> HealthTrend {
    if current - prior > delta {
        HealthTrend::Improving
    } else if prior - current > delta {
        HealthTrend::Declining
    } else {
        HealthTrend::Stable
    }
}
