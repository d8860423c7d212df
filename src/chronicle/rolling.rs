//! Multi-year rolling aggregation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{chronicle::resample::Bucket, lib::errors::ChronicleError};

/// Per-position means over a block of consecutive cycle years.
#[derive(Debug, Clone, Serialize)]
pub struct RollingSeries {
    pub start_year: i32,
    pub end_year: i32,
    pub buckets: Vec<Bucket>,
}

/// Average `window` consecutive cycle years into one series per block.
///
/// Blocks slide one year at a time over the distinct cycle years present, so
/// `n` years and a window of `w` yield `n - w + 1` series. Each block bucket
/// keeps the date of the earliest contributing year.
pub fn rolling(buckets: &[Bucket], window: usize) -> Result<Vec<RollingSeries>, ChronicleError> {
    let mut years: Vec<i32> = buckets.iter().map(|b| b.cycle_year).collect();
    years.sort_unstable();
    years.dedup();

    if window == 0 || window > years.len() {
        return Err(ChronicleError::WindowTooLarge {
            window,
            years: years.len(),
        });
    }

    let mut series = Vec::with_capacity(years.len() - window + 1);
    for start in 0..=(years.len() - window) {
        let block = &years[start..start + window];
        series.push(block_means(buckets, block));
    }
    Ok(series)
}

fn block_means(buckets: &[Bucket], block: &[i32]) -> RollingSeries {
    let mut groups: BTreeMap<u32, (chrono::NaiveDate, f64, u32)> = BTreeMap::new();

    for bucket in buckets {
        if !block.contains(&bucket.cycle_year) {
            continue;
        }
        groups
            .entry(bucket.position)
            .and_modify(|(date, sum, count)| {
                *date = (*date).min(bucket.date);
                *sum += bucket.value;
                *count += 1;
            })
            .or_insert((bucket.date, bucket.value, 1));
    }

    let start_year = *block.first().expect("block is non-empty");
    let end_year = *block.last().expect("block is non-empty");
    let buckets = groups
        .into_iter()
        .map(|(position, (date, sum, count))| Bucket {
            cycle_year: start_year,
            position,
            date,
            value: sum / count as f64,
        })
        .collect();

    RollingSeries {
        start_year,
        end_year,
        buckets,
    }
}
