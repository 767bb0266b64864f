//! Performance pattern analysis
//!
//! This module derives training patterns from workout and sleep records:
//! - Best training weekdays by mean volume
//! - Recovery profile (sleep, training frequency, rest days)

use crate::types::{
    MealTimingImpact, PerformancePattern, RecoveryProfile, SleepSample, WorkoutDay,
};
use chrono::{Datelike, Weekday};

/// Number of weekdays reported as best training days
pub const BEST_DAYS_REPORTED: usize = 3;

/// Sleep hours assumed when no sleep was logged
pub const DEFAULT_SLEEP_HOURS: f64 = 7.5;

/// Recommended rest days per week. Policy constant, not derived from data.
pub const OPTIMAL_REST_DAYS: u32 = 1;

/// Meal timing impact table: (time of day, impact score).
///
/// Static placeholder until meal timestamps are correlated with workout outcomes.
pub const MEAL_TIMING_IMPACT: [(&str, f64); 3] =
    [("07:00", 0.8), ("12:00", 0.6), ("18:00", 0.7)];

/// Performance pattern analyzer
pub struct PerformanceAnalyzer;

impl PerformanceAnalyzer {
    /// Analyze workouts and sleep within a window of `window_days` days
    pub fn analyze(
        workouts: &[WorkoutDay],
        sleep: &[SleepSample],
        window_days: u32,
    ) -> PerformancePattern {
        let best_training_days = best_training_days(workouts);
        let recovery_profile = recovery_profile(workouts, sleep, window_days);

        tracing::debug!(
            ?best_training_days,
            training_frequency = recovery_profile.training_frequency,
            "analyzed performance patterns"
        );

        PerformancePattern {
            best_training_days,
            optimal_meal_timing: meal_timing_table(),
            recovery_profile,
        }
    }
}

/// Weekdays ranked by mean daily volume, highest first.
///
/// Ties keep the order in which weekdays first appear in `workouts`.
pub fn best_training_days(workouts: &[WorkoutDay]) -> Vec<Weekday> {
    // (weekday, total volume, day count) in first-appearance order
    let mut by_weekday: Vec<(Weekday, f64, u32)> = Vec::with_capacity(7);

    for day in workouts {
        let weekday = day.date.weekday();
        let volume = day.total_volume();
        match by_weekday.iter_mut().find(|(w, _, _)| *w == weekday) {
            Some(entry) => {
                entry.1 += volume;
                entry.2 += 1;
            }
            None => by_weekday.push((weekday, volume, 1)),
        }
    }

    let mut averages: Vec<(Weekday, f64)> = by_weekday
        .into_iter()
        .map(|(weekday, total, count)| (weekday, total / count as f64))
        .collect();

    // Stable sort keeps first-appearance order for equal means
    averages.sort_by(|a, b| b.1.total_cmp(&a.1));

    averages
        .into_iter()
        .take(BEST_DAYS_REPORTED)
        .map(|(weekday, _)| weekday)
        .collect()
}

fn recovery_profile(
    workouts: &[WorkoutDay],
    sleep: &[SleepSample],
    window_days: u32,
) -> RecoveryProfile {
    let avg_sleep = if sleep.is_empty() {
        DEFAULT_SLEEP_HOURS
    } else {
        sleep.iter().map(|s| s.hours).sum::<f64>() / sleep.len() as f64
    };

    let training_days = workouts.iter().filter(|d| d.has_sessions()).count();
    let training_frequency = if window_days == 0 {
        0.0
    } else {
        training_days as f64 / window_days as f64 * 7.0
    };

    RecoveryProfile {
        avg_sleep_before_good_workouts: avg_sleep,
        training_frequency,
        optimal_rest_days: OPTIMAL_REST_DAYS,
    }
}

fn meal_timing_table() -> Vec<MealTimingImpact> {
    MEAL_TIMING_IMPACT
        .iter()
        .map(|(time, impact)| MealTimingImpact {
            time: time.to_string(),
            impact: *impact,
        })
        .collect()
}
