//! Bucket aggregation at daily, weekly, or monthly resolution.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::chronicle::{
    calendar::CyclePoint,
    series::{Chronicle, Observation},
};

/// Resampling frequency over the annual cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Cycle position of a point at this frequency.
    fn position(&self, point: &CyclePoint) -> u32 {
        match self {
            Frequency::Daily => point.day,
            Frequency::Weekly => point.week,
            Frequency::Monthly => point.month,
        }
    }

    /// Number of buckets in one cycle.
    pub fn buckets_per_cycle(&self) -> u32 {
        match self {
            Frequency::Daily => 365,
            Frequency::Weekly => 52,
            Frequency::Monthly => 12,
        }
    }
}

/// Mean value of one cycle bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bucket {
    pub cycle_year: i32,
    /// Position within the cycle: day, week, or month number.
    pub position: u32,
    /// First date contributing to the bucket.
    pub date: NaiveDate,
    pub value: f64,
}

/// Aggregate cycle points into per-(cycle year, position) mean buckets.
pub fn resample(points: &[CyclePoint], freq: Frequency) -> Vec<Bucket> {
    let mut groups: BTreeMap<(i32, u32), (NaiveDate, f64, u32)> = BTreeMap::new();

    for point in points {
        let key = (point.cycle_year, freq.position(point));
        groups
            .entry(key)
            .and_modify(|(_, sum, count)| {
                *sum += point.value;
                *count += 1;
            })
            .or_insert((point.date, point.value, 1));
    }

    groups
        .into_iter()
        .map(|((cycle_year, position), (date, sum, count))| Bucket {
            cycle_year,
            position,
            date,
            value: sum / count as f64,
        })
        .collect()
}

/// Mean observations per calendar period, keeping the first date of each.
///
/// Unlike [`resample`], this works on the plain time axis: weekly means
/// follow ISO weeks and monthly means calendar months, so the output stays a
/// time-ordered series.
pub fn resample_observations(chronicle: &Chronicle, freq: Frequency) -> Vec<Observation> {
    let period = |date: NaiveDate| -> (i32, u32) {
        match freq {
            Frequency::Daily => (date.year(), date.ordinal()),
            Frequency::Weekly => {
                let week = date.iso_week();
                (week.year(), week.week())
            }
            Frequency::Monthly => (date.year(), date.month()),
        }
    };

    let mut groups: BTreeMap<(i32, u32), (NaiveDate, f64, u32)> = BTreeMap::new();
    for obs in chronicle.observations() {
        groups
            .entry(period(obs.date))
            .and_modify(|(_, sum, count)| {
                *sum += obs.value;
                *count += 1;
            })
            .or_insert((obs.date, obs.value, 1));
    }

    groups
        .into_values()
        .map(|(date, sum, count)| Observation {
            date,
            value: sum / count as f64,
        })
        .collect()
}

/// Replace bucket values with per-cycle-year running sums.
pub fn cumulative(buckets: &mut [Bucket]) {
    let mut current_year: Option<i32> = None;
    let mut running = 0.0;

    // Buckets arrive ordered by (cycle_year, position).
    for bucket in buckets {
        if current_year != Some(bucket.cycle_year) {
            current_year = Some(bucket.cycle_year);
            running = 0.0;
        }
        running += bucket.value;
        bucket.value = running;
    }
}
