//! Metabolic profile estimation
//!
//! A coarse energy-balance estimate: calories consumed per kg of body-weight change
//! over the window, plus macro sensitivity and hydration impact.

use crate::types::{
    DailyMetricRecord, HealthScore, MacroSensitivity, MetabolicProfile, WeightSample,
};

/// Standard kcal-per-kg approximation, used when weight did not change
pub const DEFAULT_KCAL_PER_KG: f64 = 7700.0;

/// Macro sensitivity coefficients.
///
/// Fixed placeholders until a regression over intake and weight change replaces them.
pub const MACRO_SENSITIVITY: MacroSensitivity = MacroSensitivity {
    protein: 0.8,
    carbs: 0.6,
    fats: 0.4,
};

/// Metabolic profile estimator
pub struct MetabolicEstimator;

impl MetabolicEstimator {
    /// Estimate the profile for a window.
    ///
    /// `weights` is expected in ascending date order; the change is last minus first.
    pub fn estimate(
        records: &[DailyMetricRecord],
        weights: &[WeightSample],
        score: &HealthScore,
    ) -> MetabolicProfile {
        let total_calories: f64 = records.iter().map(|r| r.total_calories).sum();
        let weight_change = weight_change(weights);

        let efficiency = if weight_change == 0.0 {
            DEFAULT_KCAL_PER_KG
        } else {
            total_calories / weight_change.abs()
        };

        tracing::debug!(total_calories, weight_change, efficiency, "estimated metabolic profile");

        MetabolicProfile {
            efficiency,
            macro_sensitivity: MACRO_SENSITIVITY,
            hydration_impact: score.hydration as f64 / 100.0,
        }
    }
}

/// Last minus first weight; 0 with fewer than two samples
fn weight_change(weights: &[WeightSample]) -> f64 {
    match (weights.first(), weights.last()) {
        (Some(first), Some(last)) => last.weight - first.weight,
        _ => 0.0,
    }
}
