//! Per-position distribution statistics against a focus year.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{chronicle::resample::Bucket, lib::errors::ChronicleError};

/// Quantile levels reported for each cycle position.
pub const QUANTILE_LEVELS: [f64; 10] =
    [0.0, 0.01, 0.05, 0.10, 0.25, 0.75, 0.90, 0.95, 0.99, 1.0];

/// Distribution of historical values at one cycle position.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsRow {
    pub position: u32,
    /// Earliest date observed at this position.
    pub date: NaiveDate,
    pub min: f64,
    pub q01: f64,
    pub q05: f64,
    pub q10: f64,
    pub q25: f64,
    pub q75: f64,
    pub q90: f64,
    pub q95: f64,
    pub q99: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Value of the focus year at this position, when present.
    pub focus: Option<f64>,
}

/// Distribution per cycle position, with the focus year held out.
///
/// The focus year's buckets never contribute to the distribution; they are
/// reported alongside it for comparison.
pub fn statistics(
    buckets: &[Bucket],
    focus_year: i32,
) -> Result<Vec<StatisticsRow>, ChronicleError> {
    let mut groups: BTreeMap<u32, (NaiveDate, Vec<f64>, Option<f64>)> = BTreeMap::new();

    for bucket in buckets {
        let entry = groups
            .entry(bucket.position)
            .or_insert((bucket.date, Vec::new(), None));
        entry.0 = entry.0.min(bucket.date);
        if bucket.cycle_year == focus_year {
            entry.2 = Some(bucket.value);
        } else {
            entry.1.push(bucket.value);
        }
    }

    if groups.values().all(|(_, rest, _)| rest.is_empty()) {
        return Err(ChronicleError::EmptySeries);
    }

    let rows = groups
        .into_iter()
        .filter(|(_, (_, rest, _))| !rest.is_empty())
        .map(|(position, (date, mut rest, focus))| {
            rest.sort_by(f64::total_cmp);
            let mean = rest.iter().sum::<f64>() / rest.len() as f64;
            StatisticsRow {
                position,
                date,
                min: quantile(&rest, 0.0),
                q01: quantile(&rest, 0.01),
                q05: quantile(&rest, 0.05),
                q10: quantile(&rest, 0.10),
                q25: quantile(&rest, 0.25),
                q75: quantile(&rest, 0.75),
                q90: quantile(&rest, 0.90),
                q95: quantile(&rest, 0.95),
                q99: quantile(&rest, 0.99),
                max: quantile(&rest, 1.0),
                mean,
                median: quantile(&rest, 0.5),
                focus,
            }
        })
        .collect();

    Ok(rows)
}

/// Linearly interpolated quantile of a sorted slice.
pub fn quantile(sorted: &[f64], level: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let rank = (sorted.len() - 1) as f64 * level;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
