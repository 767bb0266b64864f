//! Engine configuration
//!
//! Thresholds and reference values used by the analytics stages. Defaults
//! reproduce the engine's standard behavior; a TOML file can override any subset.

use crate::error::AnalyticsError;
use crate::types::MetricPair;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete engine configuration
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub correlation: CorrelationConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub insights: InsightConfig,
}

/// Strength cut-offs applied to |r|
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub strong: f64,
    pub moderate: f64,
}

impl Thresholds {
    pub const fn new(strong: f64, moderate: f64) -> Self {
        Self { strong, moderate }
    }
}

/// Per-pair significance thresholds.
///
/// The pairs deliberately do not share one threshold set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    #[serde(default = "default_weight_calories")]
    pub weight_calories: Thresholds,

    #[serde(default = "default_sleep_training")]
    pub sleep_training: Thresholds,

    #[serde(default = "default_hydration_energy")]
    pub hydration_energy: Thresholds,

    #[serde(default = "default_protein_training")]
    pub protein_training: Thresholds,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            weight_calories: default_weight_calories(),
            sleep_training: default_sleep_training(),
            hydration_energy: default_hydration_energy(),
            protein_training: default_protein_training(),
        }
    }
}

impl CorrelationConfig {
    /// Thresholds configured for a metric pair
    pub fn thresholds_for(&self, pair: MetricPair) -> Thresholds {
        match pair {
            MetricPair::WeightCalories => self.weight_calories,
            MetricPair::SleepTraining => self.sleep_training,
            MetricPair::HydrationEnergy => self.hydration_energy,
            MetricPair::ProteinTraining => self.protein_training,
        }
    }
}

/// Health score reference values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Daily kcal mapped to a calorie score of 0
    #[serde(default = "default_calorie_floor")]
    pub calorie_floor: f64,

    /// Daily kcal mapped to a calorie score of 100
    #[serde(default = "default_calorie_ceiling")]
    pub calorie_ceiling: f64,

    #[serde(default = "default_protein_reference_g")]
    pub protein_reference_g: f64,

    #[serde(default = "default_volume_reference_kg")]
    pub volume_reference_kg: f64,

    /// Minimum kcal for a day to count as logged
    #[serde(default = "default_consistency_min_calories")]
    pub consistency_min_calories: f64,

    /// Points the overall score must move to leave "stable"
    #[serde(default = "default_trend_delta")]
    pub trend_delta: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            calorie_floor: default_calorie_floor(),
            calorie_ceiling: default_calorie_ceiling(),
            protein_reference_g: default_protein_reference_g(),
            volume_reference_kg: default_volume_reference_kg(),
            consistency_min_calories: default_consistency_min_calories(),
            trend_delta: default_trend_delta(),
        }
    }
}

/// Insight trigger values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    #[serde(default = "default_min_weight_samples")]
    pub min_weight_samples: usize,

    /// Number of most recent samples the slope is taken over
    #[serde(default = "default_slope_samples")]
    pub slope_samples: usize,

    /// Minimum |kg/day| before a projection is reported
    #[serde(default = "default_slope_threshold")]
    pub slope_threshold: f64,

    #[serde(default = "default_projection_days")]
    pub projection_days: u32,

    #[serde(default = "default_actionable_change_kg")]
    pub actionable_change_kg: f64,

    #[serde(default = "default_consistency_tip_below")]
    pub consistency_tip_below: u8,

    #[serde(default = "default_hydration_tip_below")]
    pub hydration_tip_below: u8,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            min_weight_samples: default_min_weight_samples(),
            slope_samples: default_slope_samples(),
            slope_threshold: default_slope_threshold(),
            projection_days: default_projection_days(),
            actionable_change_kg: default_actionable_change_kg(),
            consistency_tip_below: default_consistency_tip_below(),
            hydration_tip_below: default_hydration_tip_below(),
        }
    }
}

// Default value functions
fn default_weight_calories() -> Thresholds {
    Thresholds::new(0.7, 0.4)
}

fn default_sleep_training() -> Thresholds {
    Thresholds::new(0.6, 0.3)
}

fn default_hydration_energy() -> Thresholds {
    Thresholds::new(0.5, 0.3)
}

fn default_protein_training() -> Thresholds {
    Thresholds::new(0.6, 0.3)
}

fn default_calorie_floor() -> f64 {
    1200.0
}

fn default_calorie_ceiling() -> f64 {
    2500.0
}

fn default_protein_reference_g() -> f64 {
    100.0
}

fn default_volume_reference_kg() -> f64 {
    2000.0
}

fn default_consistency_min_calories() -> f64 {
    500.0
}

fn default_trend_delta() -> f64 {
    10.0
}

fn default_min_weight_samples() -> usize {
    6
}

fn default_slope_samples() -> usize {
    5
}

fn default_slope_threshold() -> f64 {
    0.01
}

fn default_projection_days() -> u32 {
    30
}

fn default_actionable_change_kg() -> f64 {
    2.0
}

fn default_consistency_tip_below() -> u8 {
    70
}

fn default_hydration_tip_below() -> u8 {
    60
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load_from(path: &Path) -> Result<Self, AnalyticsError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!("Loaded engine config from {:?}", path);
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self, AnalyticsError> {
        toml::from_str(contents).map_err(|e| AnalyticsError::ConfigError(e.to_string()))
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, AnalyticsError> {
        toml::to_string_pretty(self)
            .map_err(|e| AnalyticsError::ConfigError(format!("Failed to serialize config: {}", e)))
    }
}
