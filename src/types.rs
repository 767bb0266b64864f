//! Core types for the Vitalis analytics engine
//!
//! This module defines the per-day input records supplied by the data layer and
//! the value records produced by each analytics stage.

use crate::error::{AnalyticsError, ValidationError};
use chrono::{Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Supported analytics windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum AnalyticsWindow {
    #[default]
    Week,
    Fortnight,
    Month,
}

impl AnalyticsWindow {
    /// Number of calendar days covered by the window
    pub fn days(&self) -> u32 {
        match self {
            AnalyticsWindow::Week => 7,
            AnalyticsWindow::Fortnight => 14,
            AnalyticsWindow::Month => 30,
        }
    }
}

impl TryFrom<u32> for AnalyticsWindow {
    type Error = AnalyticsError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            7 => Ok(AnalyticsWindow::Week),
            14 => Ok(AnalyticsWindow::Fortnight),
            30 => Ok(AnalyticsWindow::Month),
            other => Err(AnalyticsError::InvalidWindow(other)),
        }
    }
}

impl From<AnalyticsWindow> for u32 {
    fn from(window: AnalyticsWindow) -> Self {
        window.days()
    }
}

/// One calendar day of aggregated nutrition, training, sleep and hydration data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetricRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_protein: f64,
    #[serde(default)]
    pub total_carbs: f64,
    #[serde(default)]
    pub total_fats: f64,
    /// Sum of weight x reps across all sets that day (kg)
    #[serde(default)]
    pub workout_volume: f64,
    /// Sleep quality on a 0-10 scale
    #[serde(default)]
    pub sleep_score: f64,
    /// Hydration score; producers report either 0-10 or 0-100
    #[serde(default)]
    pub hydration_score: f64,
}

impl DailyMetricRecord {
    /// Create an empty record for a date
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_calories: 0.0,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fats: 0.0,
            workout_volume: 0.0,
            sleep_score: 0.0,
            hydration_score: 0.0,
        }
    }
}

/// Body weight measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
    pub date: NaiveDate,
    /// Body weight (kg)
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat_percentage: Option<f64>,
}

/// One night of sleep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSample {
    pub date: NaiveDate,
    pub hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
}

/// A single strength set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub weight_kg: f64,
    pub reps: u32,
}

impl WorkoutSet {
    /// Volume moved in this set (kg)
    pub fn volume(&self) -> f64 {
        self.weight_kg * self.reps as f64
    }
}

/// An advanced training session made of sets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkoutSession {
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

/// A simple check-in style workout entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleWorkout {
    pub did_workout: bool,
    #[serde(default)]
    pub steps: u32,
}

/// All training logged on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub sessions: Vec<WorkoutSession>,
    #[serde(default)]
    pub simple_workouts: Vec<SimpleWorkout>,
}

impl WorkoutDay {
    /// Total volume across every set of every advanced session (kg)
    pub fn total_volume(&self) -> f64 {
        self.sessions
            .iter()
            .flat_map(|session| session.sets.iter())
            .map(WorkoutSet::volume)
            .sum()
    }

    /// Whether at least one advanced session was logged
    pub fn has_sessions(&self) -> bool {
        !self.sessions.is_empty()
    }
}

/// Health metrics that take part in correlation analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Weight,
    CaloricIntake,
    SleepQuality,
    TrainingVolume,
    HydrationScore,
    Energy,
    ProteinIntake,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Weight => "weight",
            Metric::CaloricIntake => "caloric_intake",
            Metric::SleepQuality => "sleep_quality",
            Metric::TrainingVolume => "training_volume",
            Metric::HydrationScore => "hydration_score",
            Metric::Energy => "energy",
            Metric::ProteinIntake => "protein_intake",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Weight => "Weight",
            Metric::CaloricIntake => "Caloric intake",
            Metric::SleepQuality => "Sleep quality",
            Metric::TrainingVolume => "Training volume",
            Metric::HydrationScore => "Hydration",
            Metric::Energy => "Energy",
            Metric::ProteinIntake => "Protein intake",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metric pairs analysed by the correlation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricPair {
    WeightCalories,
    SleepTraining,
    HydrationEnergy,
    ProteinTraining,
}

impl MetricPair {
    /// Every pair, in report order
    pub const ALL: [MetricPair; 4] = [
        MetricPair::WeightCalories,
        MetricPair::SleepTraining,
        MetricPair::HydrationEnergy,
        MetricPair::ProteinTraining,
    ];

    pub fn metrics(&self) -> (Metric, Metric) {
        match self {
            MetricPair::WeightCalories => (Metric::Weight, Metric::CaloricIntake),
            MetricPair::SleepTraining => (Metric::SleepQuality, Metric::TrainingVolume),
            MetricPair::HydrationEnergy => (Metric::HydrationScore, Metric::Energy),
            MetricPair::ProteinTraining => (Metric::ProteinIntake, Metric::TrainingVolume),
        }
    }
}

/// Correlation strength tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    Strong,
    Moderate,
    Weak,
}

/// Sign of a correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationDirection {
    Positive,
    Negative,
    Neutral,
}

impl CorrelationDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationDirection::Positive => "positive",
            CorrelationDirection::Negative => "negative",
            CorrelationDirection::Neutral => "neutral",
        }
    }
}

/// Pearson correlation between two metric series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub pair: MetricPair,
    pub metric1: Metric,
    pub metric2: Metric,
    /// Pearson coefficient in [-1, 1]
    pub correlation: f64,
    pub significance: Significance,
    pub direction: CorrelationDirection,
    /// Number of aligned points the coefficient was computed from
    pub sample_size: usize,
}

/// Health score trend relative to the previous week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthTrend {
    Improving,
    #[default]
    Stable,
    Declining,
}

/// Composite health score and its five sub-scores, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HealthScore {
    pub overall: u8,
    pub nutrition: u8,
    pub training: u8,
    pub recovery: u8,
    pub hydration: u8,
    pub consistency: u8,
    pub trend: HealthTrend,
}

/// Insight category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    GoalPrediction,
    PatternDetection,
    OptimizationTip,
}

/// A generated, human-readable observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    /// Confidence (0-100)
    pub confidence: u8,
    pub actionable: bool,
}

/// Impact of eating at a given time of day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealTimingImpact {
    /// Local time of day, "HH:MM"
    pub time: String,
    pub impact: f64,
}

/// Recovery characteristics derived from sleep and training records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryProfile {
    /// Average hours of sleep (h)
    pub avg_sleep_before_good_workouts: f64,
    /// Training days per week
    pub training_frequency: f64,
    pub optimal_rest_days: u32,
}

/// Training performance patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePattern {
    /// Up to three weekdays with the highest mean training volume
    #[serde(with = "weekday_names")]
    pub best_training_days: Vec<Weekday>,
    pub optimal_meal_timing: Vec<MealTimingImpact>,
    pub recovery_profile: RecoveryProfile,
}

/// Macro sensitivity coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSensitivity {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Coarse metabolic estimate for the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetabolicProfile {
    /// kcal consumed per kg of weight change
    pub efficiency: f64,
    pub macro_sensitivity: MacroSensitivity,
    /// Hydration multiplier (0-1)
    pub hydration_impact: f64,
}

/// Everything the engine needs for one computation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyticsInput {
    #[serde(default)]
    pub window: AnalyticsWindow,
    /// Last day of the window; defaults to the latest date present in the data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    #[serde(default)]
    pub daily_records: Vec<DailyMetricRecord>,
    #[serde(default)]
    pub weight_history: Vec<WeightSample>,
    #[serde(default)]
    pub sleep_samples: Vec<SleepSample>,
    #[serde(default)]
    pub workout_days: Vec<WorkoutDay>,
}

impl AnalyticsInput {
    /// Check the input contract the data layer is expected to uphold.
    ///
    /// The engine never calls this; it tolerates sparse or odd data. Returns every
    /// violation found rather than stopping at the first.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for record in &self.daily_records {
            let date = record.date.to_string();
            if !seen.insert(record.date) {
                errors.push(ValidationError::DuplicateDate { date: date.clone() });
            }

            let fields = [
                ("total_calories", record.total_calories),
                ("total_protein", record.total_protein),
                ("total_carbs", record.total_carbs),
                ("total_fats", record.total_fats),
                ("workout_volume", record.workout_volume),
                ("hydration_score", record.hydration_score),
            ];
            for (field, value) in fields {
                if value < 0.0 {
                    errors.push(ValidationError::NegativeValue {
                        date: date.clone(),
                        field,
                        value,
                    });
                }
            }

            if !(0.0..=10.0).contains(&record.sleep_score) {
                errors.push(ValidationError::SleepScoreOutOfRange {
                    date,
                    value: record.sleep_score,
                });
            }
        }

        for sample in &self.weight_history {
            if sample.weight <= 0.0 {
                errors.push(ValidationError::InvalidWeight {
                    date: sample.date.to_string(),
                    value: sample.weight,
                });
            }
        }

        errors
    }

    /// Latest date present in any series
    pub fn latest_date(&self) -> Option<NaiveDate> {
        let daily = self.daily_records.iter().map(|r| r.date);
        let weights = self.weight_history.iter().map(|w| w.date);
        let sleep = self.sleep_samples.iter().map(|s| s.date);
        let workouts = self.workout_days.iter().map(|w| w.date);
        daily.chain(weights).chain(sleep).chain(workouts).max()
    }
}

/// Output of one analytics computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub window: AnalyticsWindow,
    pub as_of: Option<NaiveDate>,
    pub correlations: Vec<CorrelationResult>,
    pub health_score: HealthScore,
    pub insights: Vec<Insight>,
    pub performance_patterns: PerformancePattern,
    pub metabolic_profile: MetabolicProfile,
}

/// Serialize weekdays by their English name ("Monday")
mod weekday_names {
    use chrono::Weekday;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(days: &[Weekday], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(days.iter().map(|day| super::weekday_name(*day)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Weekday>, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names
            .iter()
            .map(|name| name.parse::<Weekday>().map_err(D::Error::custom))
            .collect()
    }
}

/// The date `days` calendar days before `date`, saturating at the earliest date
pub fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

/// English weekday name for display
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_window_from_days() {
        assert_eq!(AnalyticsWindow::try_from(14).unwrap(), AnalyticsWindow::Fortnight);
        assert!(matches!(
            AnalyticsWindow::try_from(10),
            Err(AnalyticsError::InvalidWindow(10))
        ));
    }

    #[test]
    fn test_window_serializes_as_days() {
        let json = serde_json::to_string(&AnalyticsWindow::Month).unwrap();
        assert_eq!(json, "30");
        assert!(serde_json::from_str::<AnalyticsWindow>("21").is_err());
    }

    #[test]
    fn test_workout_day_volume() {
        let day = WorkoutDay {
            date: date("2024-03-04"),
            sessions: vec![
                WorkoutSession {
                    sets: vec![
                        WorkoutSet {
                            weight_kg: 100.0,
                            reps: 5,
                        },
                        WorkoutSet {
                            weight_kg: 80.0,
                            reps: 10,
                        },
                    ],
                },
                WorkoutSession {
                    sets: vec![WorkoutSet {
                        weight_kg: 20.0,
                        reps: 12,
                    }],
                },
            ],
            simple_workouts: vec![],
        };

        assert!((day.total_volume() - 1540.0).abs() < f64::EPSILON);
        assert!(day.has_sessions());
    }

    #[test]
    fn test_validate_reports_every_violation() {
        let mut duplicate = DailyMetricRecord::empty(date("2024-03-04"));
        duplicate.total_calories = -10.0;
        duplicate.sleep_score = 11.0;

        let input = AnalyticsInput {
            daily_records: vec![DailyMetricRecord::empty(date("2024-03-04")), duplicate],
            weight_history: vec![WeightSample {
                date: date("2024-03-04"),
                weight: 0.0,
                body_fat_percentage: None,
            }],
            ..Default::default()
        };

        let errors = input.validate();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::DuplicateDate {
            date: "2024-03-04".to_string()
        }));
    }

    #[test]
    fn test_weekday_names_serialization() {
        let pattern = PerformancePattern {
            best_training_days: vec![Weekday::Tue, Weekday::Sat],
            optimal_meal_timing: vec![],
            recovery_profile: RecoveryProfile {
                avg_sleep_before_good_workouts: 7.5,
                training_frequency: 0.0,
                optimal_rest_days: 1,
            },
        };

        let value = serde_json::to_value(&pattern).unwrap();
        assert_eq!(value["best_training_days"][0], "Tuesday");

        let back: PerformancePattern = serde_json::from_value(value).unwrap();
        assert_eq!(back.best_training_days, vec![Weekday::Tue, Weekday::Sat]);
    }

    #[test]
    fn test_days_before() {
        assert_eq!(days_before(date("2024-03-01"), 7), date("2024-02-23"));
        assert_eq!(days_before(NaiveDate::MIN, 1), NaiveDate::MIN);
    }

    #[test]
    fn test_latest_date_spans_all_series() {
        let input = AnalyticsInput {
            daily_records: vec![DailyMetricRecord::empty(date("2024-03-01"))],
            sleep_samples: vec![SleepSample {
                date: date("2024-03-09"),
                hours: 7.0,
                quality_score: None,
            }],
            ..Default::default()
        };
        assert_eq!(input.latest_date(), Some(date("2024-03-09")));
        assert_eq!(AnalyticsInput::default().latest_date(), None);
    }
}
