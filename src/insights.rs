//! Insight generation
//!
//! Derives human-readable insights from the weight trend, the correlation results
//! and the health score. Purely derivative: every insight is gated on its own
//! trigger and missing data simply yields fewer insights.

use crate::config::InsightConfig;
use crate::types::{
    CorrelationResult, HealthScore, Insight, InsightType, Significance, WeightSample,
};

/// Fixed confidence of the logging-consistency tip
pub const CONSISTENCY_TIP_CONFIDENCE: u8 = 85;

/// Fixed confidence of the hydration tip
pub const HYDRATION_TIP_CONFIDENCE: u8 = 75;

/// Ceiling on goal-prediction confidence
const MAX_PREDICTION_CONFIDENCE: u32 = 90;

/// Insight generator
pub struct InsightGenerator;

impl InsightGenerator {
    /// Generate all insights whose triggers fire, in a stable order:
    /// goal prediction, pattern detection, then optimization tips.
    ///
    /// `weights` is expected in ascending date order. `scored_days` is the number of
    /// daily records the health score was computed from.
    pub fn generate(
        weights: &[WeightSample],
        correlations: &[CorrelationResult],
        score: &HealthScore,
        scored_days: usize,
        config: &InsightConfig,
    ) -> Vec<Insight> {
        let mut insights = Vec::new();

        if let Some(prediction) = goal_prediction(weights, config) {
            insights.push(prediction);
        }

        if let Some(pattern) = pattern_detection(correlations) {
            insights.push(pattern);
        }

        // Tips need a scored week; an all-zero score from logged days still qualifies
        if scored_days > 0 {
            insights.extend(optimization_tips(score, config));
        }

        tracing::debug!(count = insights.len(), "generated insights");
        insights
    }
}

/// Project the recent weight slope forward
fn goal_prediction(weights: &[WeightSample], config: &InsightConfig) -> Option<Insight> {
    if weights.len() < config.min_weight_samples || config.slope_samples == 0 {
        return None;
    }

    let recent = &weights[weights.len().saturating_sub(config.slope_samples)..];
    let first = recent.first()?;
    let last = recent.last()?;
    let slope = (last.weight - first.weight) / config.slope_samples as f64;

    if slope.abs() <= config.slope_threshold {
        return None;
    }

    let projection = slope * config.projection_days as f64;
    let confidence = (50 + 8 * weights.len() as u32).min(MAX_PREDICTION_CONFIDENCE) as u8;
    let heading = if projection < 0.0 { "lose" } else { "gain" };

    Some(Insight {
        insight_type: InsightType::GoalPrediction,
        title: "Weight Trend Projection".to_string(),
        description: format!(
            "At your current rate of {:+.2} kg/day, you are on track to {} about {:.1} kg over the next {} days.",
            slope,
            heading,
            projection.abs(),
            config.projection_days
        ),
        confidence,
        actionable: projection.abs() > config.actionable_change_kg,
    })
}

/// Report the strongest "strong" correlation, if any
fn pattern_detection(correlations: &[CorrelationResult]) -> Option<Insight> {
    let strongest = correlations
        .iter()
        .filter(|c| c.significance == Significance::Strong)
        .fold(None::<&CorrelationResult>, |best, candidate| match best {
            Some(current) if current.correlation.abs() >= candidate.correlation.abs() => {
                Some(current)
            }
            _ => Some(candidate),
        })?;

    let magnitude = strongest.correlation.abs();
    Some(Insight {
        insight_type: InsightType::PatternDetection,
        title: "Strong Pattern Detected".to_string(),
        description: format!(
            "{} and {} show a strong {} correlation ({:.0}%).",
            strongest.metric1.label(),
            strongest.metric2.label().to_lowercase(),
            strongest.direction.as_str(),
            magnitude * 100.0
        ),
        confidence: (magnitude * 100.0).round().clamp(0.0, 100.0) as u8,
        actionable: false,
    })
}

fn optimization_tips(score: &HealthScore, config: &InsightConfig) -> Vec<Insight> {
    let mut tips = Vec::new();

    if score.consistency < config.consistency_tip_below {
        tips.push(Insight {
            insight_type: InsightType::OptimizationTip,
            title: "Improve Logging Consistency".to_string(),
            description: "Logging your meals every day gives more accurate insights and makes it easier to reach your goals.".to_string(),
            confidence: CONSISTENCY_TIP_CONFIDENCE,
            actionable: true,
        });
    }

    if score.hydration < config.hydration_tip_below {
        tips.push(Insight {
            insight_type: InsightType::OptimizationTip,
            title: "Boost Your Hydration".to_string(),
            description: "Your hydration is below target. Better hydration can lift your energy levels and training performance.".to_string(),
            confidence: HYDRATION_TIP_CONFIDENCE,
            actionable: true,
        });
    }

    tips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::direction;
    use crate::types::{HealthTrend, MetricPair};
    use chrono::NaiveDate;

    fn weights(values: &[f64]) -> Vec<WeightSample> {
        values
            .iter()
            .enumerate()
            .map(|(i, &weight)| WeightSample {
                date: NaiveDate::from_ymd_opt(2024, 3, 1 + i as u32).unwrap(),
                weight,
                body_fat_percentage: None,
            })
            .collect()
    }

    fn good_score() -> HealthScore {
        HealthScore {
            overall: 90,
            nutrition: 90,
            training: 90,
            recovery: 90,
            hydration: 90,
            consistency: 90,
            trend: HealthTrend::Stable,
        }
    }

    fn correlation(pair: MetricPair, r: f64, significance: Significance) -> CorrelationResult {
        let (metric1, metric2) = pair.metrics();
        CorrelationResult {
            pair,
            metric1,
            metric2,
            correlation: r,
            significance,
            direction: direction(r),
            sample_size: 7,
        }
    }

    fn generate(
        weights: &[WeightSample],
        correlations: &[CorrelationResult],
        score: &HealthScore,
    ) -> Vec<Insight> {
        InsightGenerator::generate(weights, correlations, score, 7, &InsightConfig::default())
    }

    #[test]
    fn test_no_data_no_insights() {
        assert!(generate(&[], &[], &good_score()).is_empty());
    }

    #[test]
    fn test_no_scored_days_no_tips() {
        let config = InsightConfig::default();
        let insights = InsightGenerator::generate(&[], &[], &HealthScore::default(), 0, &config);
        assert!(insights.is_empty());
    }

    #[test]
    fn test_all_zero_score_from_logged_days_gets_tips() {
        let insights = generate(&[], &[], &HealthScore::default());
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].title, "Improve Logging Consistency");
        assert_eq!(insights[1].title, "Boost Your Hydration");
    }

    #[test]
    fn test_goal_prediction() {
        // Last five samples drop 1 kg: slope -0.2 kg/day, -6 kg over 30 days
        let samples = weights(&[82.0, 81.0, 80.6, 80.4, 80.2, 80.0]);
        let insights = generate(&samples, &[], &good_score());

        assert_eq!(insights.len(), 1);
        let prediction = &insights[0];
        assert_eq!(prediction.insight_type, InsightType::GoalPrediction);
        assert_eq!(prediction.confidence, 90);
        assert!(prediction.actionable);
        assert!(prediction.description.contains("lose about 6.0 kg"));
    }

    #[test]
    fn test_goal_prediction_not_actionable_for_small_change() {
        // 0.25 kg over five samples: 0.05 kg/day, 1.5 kg over 30 days
        let samples = weights(&[80.0, 80.0, 80.05, 80.1, 80.2, 80.25]);
        let insights = generate(&samples, &[], &good_score());

        assert_eq!(insights.len(), 1);
        assert!(!insights[0].actionable);
    }

    #[test]
    fn test_goal_prediction_requires_six_samples() {
        let samples = weights(&[90.0, 85.0, 80.0, 75.0, 70.0]);
        let insights = generate(&samples, &[], &good_score());
        assert!(insights
            .iter()
            .all(|i| i.insight_type != InsightType::GoalPrediction));
    }

    #[test]
    fn test_flat_weight_no_prediction() {
        let samples = weights(&[80.0, 80.0, 80.0, 80.0, 80.0, 80.04]);
        assert!(generate(&samples, &[], &good_score()).is_empty());
    }

    #[test]
    fn test_strong_correlation_pattern() {
        let correlations = vec![
            correlation(MetricPair::WeightCalories, 0.2, Significance::Weak),
            correlation(MetricPair::SleepTraining, 1.0, Significance::Strong),
            correlation(MetricPair::ProteinTraining, 0.65, Significance::Strong),
        ];
        let insights = generate(&[], &correlations, &good_score());

        let patterns: Vec<&Insight> = insights
            .iter()
            .filter(|i| i.insight_type == InsightType::PatternDetection)
            .collect();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].confidence, 100);
        assert!(patterns[0].description.contains("Sleep quality"));
        assert!(patterns[0].description.contains("positive"));
    }

    #[test]
    fn test_moderate_correlation_no_pattern() {
        let correlations = vec![correlation(
            MetricPair::WeightCalories,
            -0.6,
            Significance::Moderate,
        )];
        assert!(generate(&[], &correlations, &good_score()).is_empty());
    }

    #[test]
    fn test_optimization_tips() {
        let score = HealthScore {
            consistency: 43,
            hydration: 50,
            ..good_score()
        };
        let insights = generate(&[], &[], &score);

        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].confidence, CONSISTENCY_TIP_CONFIDENCE);
        assert_eq!(insights[1].confidence, HYDRATION_TIP_CONFIDENCE);
        assert!(insights.iter().all(|i| i.actionable
            && i.insight_type == InsightType::OptimizationTip));
    }

    #[test]
    fn test_tip_thresholds_are_exclusive() {
        let score = HealthScore {
            consistency: 70,
            hydration: 60,
            ..good_score()
        };
        assert!(generate(&[], &[], &score).is_empty());
    }
}
