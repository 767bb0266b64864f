//! Pipeline orchestration
//!
//! This module provides the public API for Vitalis Analytics.
//! It resolves the analytics window and runs every stage over the same input.

use crate::config::EngineConfig;
use crate::correlation::CorrelationEngine;
use crate::encoder::ReportEncoder;
use crate::error::AnalyticsError;
use crate::health_score::{scored_days, HealthScoreCalculator};
use crate::insights::InsightGenerator;
use crate::metabolic::MetabolicEstimator;
use crate::performance::PerformanceAnalyzer;
use crate::types::{
    days_before, AnalyticsInput, AnalyticsReport, DailyMetricRecord, HealthScore, SleepSample,
    WeightSample, WorkoutDay,
};
use chrono::NaiveDate;

/// Compute the full analytics report with the default configuration.
///
/// Pure and deterministic: identical inputs give identical reports.
///
/// # Example
/// ```ignore
/// let report = compute_analytics(&AnalyticsInput {
///     window: AnalyticsWindow::Fortnight,
///     daily_records,
///     ..Default::default()
/// });
/// println!("health score: {}", report.health_score.overall);
/// ```
pub fn compute_analytics(input: &AnalyticsInput) -> AnalyticsReport {
    run_stages(input, &EngineConfig::default())
}

/// Convert an analytics input JSON document into a report envelope JSON (stateless, one-shot).
///
/// # Arguments
/// * `input_json` - JSON-encoded [`AnalyticsInput`]
///
/// # Returns
/// Pretty-printed JSON report envelope
pub fn analytics_from_json(input_json: String) -> Result<String, AnalyticsError> {
    AnalyticsEngine::new().process_json(&input_json)
}

/// Engine with a fixed configuration.
///
/// Holds no per-user state; one engine can serve any number of computations.
pub struct AnalyticsEngine {
    config: EngineConfig,
    encoder: ReportEncoder,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with a custom configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            encoder: ReportEncoder::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute the report for one input
    pub fn compute(&self, input: &AnalyticsInput) -> AnalyticsReport {
        run_stages(input, &self.config)
    }

    /// Parse an input JSON document, compute, and encode the report envelope
    pub fn process_json(&self, input_json: &str) -> Result<String, AnalyticsError> {
        let input: AnalyticsInput = serde_json::from_str(input_json)?;
        let report = self.compute(&input);
        self.encoder.encode_to_json(report)
    }
}

/// Inputs sorted by date and cut to the analytics window
struct WindowedInput {
    /// Every daily record up to `as_of`; the health score trend needs the week before the window
    history: Vec<DailyMetricRecord>,
    daily: Vec<DailyMetricRecord>,
    weights: Vec<WeightSample>,
    sleep: Vec<SleepSample>,
    workouts: Vec<WorkoutDay>,
}

impl WindowedInput {
    fn resolve(input: &AnalyticsInput, as_of: NaiveDate) -> Self {
        let start = days_before(as_of, input.window.days() as u64);
        let in_window = |date: NaiveDate| date > start && date <= as_of;

        let mut history: Vec<DailyMetricRecord> = input
            .daily_records
            .iter()
            .filter(|r| r.date <= as_of)
            .cloned()
            .collect();
        history.sort_by_key(|r| r.date);

        let daily = history.iter().filter(|r| in_window(r.date)).cloned().collect();
        let weights = sorted_in_window(&input.weight_history, |w| w.date, in_window);
        let sleep = sorted_in_window(&input.sleep_samples, |s| s.date, in_window);
        let workouts = sorted_in_window(&input.workout_days, |w| w.date, in_window);

        Self {
            history,
            daily,
            weights,
            sleep,
            workouts,
        }
    }
}

fn sorted_in_window<T: Clone>(
    items: &[T],
    date_of: impl Fn(&T) -> NaiveDate,
    in_window: impl Fn(NaiveDate) -> bool,
) -> Vec<T> {
    let mut selected: Vec<T> = items
        .iter()
        .filter(|item| in_window(date_of(item)))
        .cloned()
        .collect();
    selected.sort_by_key(|item| date_of(item));
    selected
}

/// Run every analytics stage.
///
/// Stages:
/// 1. CorrelationEngine - metric pair correlations over the window
/// 2. HealthScoreCalculator - sub-scores and trend over the last two weeks
/// 3. InsightGenerator - reads the outputs of stages 1 and 2
/// 4. PerformanceAnalyzer - weekday volume ranking and recovery profile
/// 5. MetabolicEstimator - kcal per kg of weight change
fn run_stages(input: &AnalyticsInput, config: &EngineConfig) -> AnalyticsReport {
    let as_of = input.as_of.or_else(|| input.latest_date());
    let window_days = input.window.days();

    let windowed = match as_of {
        Some(as_of) => WindowedInput::resolve(input, as_of),
        None => WindowedInput {
            history: Vec::new(),
            daily: Vec::new(),
            weights: Vec::new(),
            sleep: Vec::new(),
            workouts: Vec::new(),
        },
    };

    tracing::debug!(
        ?as_of,
        window_days,
        daily = windowed.daily.len(),
        weights = windowed.weights.len(),
        sleep = windowed.sleep.len(),
        workouts = windowed.workouts.len(),
        "resolved analytics window"
    );

    let correlations =
        CorrelationEngine::analyze(&windowed.daily, &windowed.weights, &config.correlation);

    let (health_score, scored_days) = match as_of {
        Some(as_of) => (
            HealthScoreCalculator::calculate(&windowed.history, as_of, &config.scoring),
            scored_days(&windowed.history, as_of),
        ),
        None => (HealthScore::default(), 0),
    };

    let insights = InsightGenerator::generate(
        &windowed.weights,
        &correlations,
        &health_score,
        scored_days,
        &config.insights,
    );

    let performance_patterns =
        PerformanceAnalyzer::analyze(&windowed.workouts, &windowed.sleep, window_days);

    let metabolic_profile =
        MetabolicEstimator::estimate(&windowed.daily, &windowed.weights, &health_score);

    AnalyticsReport {
        window: input.window,
        as_of,
        correlations,
        health_score,
        insights,
        performance_patterns,
        metabolic_profile,
    }
}
