//! Condenses daily temperature samples into monthly extremes.

use crate::models::{CoordKey, DailySample, MonthKey, MonthlyRecord};

/// Bucket chronologically ascending daily samples into one record per
/// calendar month present in the input, in the same order.
///
/// Single linear pass: the running max starts at negative infinity and the
/// running min at positive infinity; crossing a month boundary flushes the
/// accumulated record and resets both accumulators before the new sample is
/// folded in, so a month with exactly one sample still yields
/// max == min == that sample's values. Empty input yields empty output.
pub fn monthly_extremes(coord: &CoordKey, samples: &[DailySample]) -> Vec<MonthlyRecord> {
    let Some(first) = samples.first() else {
        return Vec::new();
    };

    let mut monthly = Vec::new();
    let mut current_month = MonthKey::from(first.date);
    let mut current_max = f64::NEG_INFINITY;
    let mut current_min = f64::INFINITY;

    for sample in samples {
        let month = MonthKey::from(sample.date);
        if month != current_month {
            monthly.push(MonthlyRecord {
                coord: coord.clone(),
                month: current_month,
                max_temp: current_max,
                min_temp: current_min,
            });
            current_month = month;
            current_max = f64::NEG_INFINITY;
            current_min = f64::INFINITY;
        }

        if sample.max_temp > current_max {
            current_max = sample.max_temp;
        }
        if sample.min_temp < current_min {
            current_min = sample.min_temp;
        }
    }

    monthly.push(MonthlyRecord {
        coord: coord.clone(),
        month: current_month,
        max_temp: current_max,
        min_temp: current_min,
    });

    monthly
}
