//! Daily aggregation
//!
//! Folds already-fetched raw entries (meals, hydration logs, workouts, sleep) into
//! one [`DailyMetricRecord`] per calendar day. This is the shape the data layer is
//! expected to hand the engine; callers that already aggregate can skip it.

use crate::types::{DailyMetricRecord, SleepSample, WorkoutDay};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hours of sleep mapped to a full 10/10 sleep score when no quality score is logged
pub const FULL_SCORE_SLEEP_HOURS: f64 = 8.0;

/// A logged meal or food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
}

/// A hydration check-in (0-10 or 0-100, as reported)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationEntry {
    pub date: NaiveDate,
    pub score: f64,
}

/// Raw entries for one user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEntries {
    #[serde(default)]
    pub meals: Vec<MealEntry>,
    #[serde(default)]
    pub hydration: Vec<HydrationEntry>,
    #[serde(default)]
    pub workouts: Vec<WorkoutDay>,
    #[serde(default)]
    pub sleep: Vec<SleepSample>,
}

/// Daily aggregator
pub struct DailyAggregator;

impl DailyAggregator {
    /// Aggregate raw entries into per-day records, ascending by date.
    ///
    /// A record is produced for every date with at least one entry of any kind.
    pub fn aggregate(entries: &RawEntries) -> Vec<DailyMetricRecord> {
        let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();

        for meal in &entries.meals {
            let day = days.entry(meal.date).or_default();
            day.calories += meal.calories;
            day.protein += meal.protein;
            day.carbs += meal.carbs;
            day.fats += meal.fats;
        }

        for entry in &entries.hydration {
            days.entry(entry.date).or_default().hydration.push(entry.score);
        }

        for workout in &entries.workouts {
            days.entry(workout.date).or_default().volume += workout.total_volume();
        }

        for sample in &entries.sleep {
            days.entry(sample.date).or_default().sleep.push(sleep_score(sample));
        }

        let records: Vec<DailyMetricRecord> = days
            .into_iter()
            .map(|(date, day)| day.into_record(date))
            .collect();

        tracing::debug!(days = records.len(), "aggregated daily records");
        records
    }
}

/// Sleep score on a 0-10 scale; the logged quality score wins over duration
pub fn sleep_score(sample: &SleepSample) -> f64 {
    match sample.quality_score {
        Some(quality) => quality.clamp(0.0, 10.0),
        None => (sample.hours / FULL_SCORE_SLEEP_HOURS * 10.0).clamp(0.0, 10.0),
    }
}

#[derive(Default)]
struct DayAccumulator {
    calories: f64,
    protein: f64,
    carbs: f64,
    fats: f64,
    volume: f64,
    sleep: Vec<f64>,
    hydration: Vec<f64>,
}

impl DayAccumulator {
    fn into_record(self, date: NaiveDate) -> DailyMetricRecord {
        DailyMetricRecord {
            date,
            total_calories: self.calories,
            total_protein: self.protein,
            total_carbs: self.carbs,
            total_fats: self.fats,
            workout_volume: self.volume,
            sleep_score: average(&self.sleep),
            hydration_score: average(&self.hydration),
        }
    }
}

fn average(values: &[f64]) -> f64 {
    crate::normalizer::mean(values).unwrap_or(0.0)
}
