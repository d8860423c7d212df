//! Analysis request handling: load, normalize, transform, serialize.

use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use crate::{
    chronicle::{
        calendar::map_to_cycle,
        loader::{load_chronicle, DateFormat},
        resample::{cumulative, resample, resample_observations, Bucket, Frequency},
        rolling::{rolling, RollingSeries},
        series::Observation,
        stats::{statistics, StatisticsRow},
    },
    lib::errors::ChronicleError,
};

const TARGET: &str = "bbapp::chronicle";

/// What the analysis should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// The filtered, gap-filled series in plain time order, resampled at the
    /// requested frequency.
    Historical,
    /// Per-cycle-year series over the annual cycle.
    AnnualCycle,
    /// Distribution per cycle position against a focus year.
    Statistics,
}

/// A fully resolved analysis job.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub input: PathBuf,
    pub time_col: String,
    pub value_col: String,
    pub date_format: DateFormat,
    pub mode: AnalysisMode,
    pub frequency: Frequency,
    /// First month of the annual cycle, 1..=12.
    pub start_month: u32,
    pub focus_year: Option<i32>,
    pub rolling_window: Option<usize>,
    pub cumulative: bool,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
}

/// One cycle year's resampled buckets.
#[derive(Debug, Clone, Serialize)]
pub struct CycleYearSeries {
    pub cycle_year: i32,
    pub buckets: Vec<Bucket>,
}

/// Mode-specific analysis result, tagged for JSON consumers.
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AnalysisOutput {
    Historical {
        time_label: String,
        value_label: String,
        frequency: Frequency,
        observations: Vec<Observation>,
    },
    HistoricalRolling {
        value_label: String,
        frequency: Frequency,
        window: usize,
        series: Vec<RollingSeries>,
    },
    AnnualCycle {
        frequency: Frequency,
        start_month: u32,
        cumulative: bool,
        years: Vec<CycleYearSeries>,
    },
    AnnualCycleRolling {
        frequency: Frequency,
        start_month: u32,
        cumulative: bool,
        window: usize,
        series: Vec<RollingSeries>,
    },
    Statistics {
        frequency: Frequency,
        start_month: u32,
        cumulative: bool,
        focus_year: i32,
        rows: Vec<StatisticsRow>,
    },
}

/// Run an analysis end to end.
pub fn run_analysis(request: &AnalysisRequest) -> Result<AnalysisOutput, ChronicleError> {
    let chronicle = load_chronicle(
        &request.input,
        &request.time_col,
        &request.value_col,
        &request.date_format,
    )?;
    let chronicle = if request.year_min.is_some() || request.year_max.is_some() {
        chronicle.filter_years(request.year_min, request.year_max)?
    } else {
        chronicle
    };
    let chronicle = chronicle.fill_daily()?;

    match request.mode {
        AnalysisMode::Historical => {
            if request.cumulative {
                warn!(target: TARGET, "cumulative transform has no effect in historical mode");
            }
            if let Some(window) = request.rolling_window {
                // Rolling averages year blocks, so the series leaves the
                // plain time axis and is reported per block instead.
                let points = map_to_cycle(&chronicle, request.start_month)?;
                let buckets = resample(&points, request.frequency);
                let series = rolling(&buckets, window)?;
                Ok(AnalysisOutput::HistoricalRolling {
                    value_label: chronicle.value_label().to_string(),
                    frequency: request.frequency,
                    window,
                    series,
                })
            } else {
                Ok(AnalysisOutput::Historical {
                    time_label: chronicle.time_label().to_string(),
                    value_label: chronicle.value_label().to_string(),
                    frequency: request.frequency,
                    observations: resample_observations(&chronicle, request.frequency),
                })
            }
        }
        AnalysisMode::AnnualCycle => {
            let buckets = cycle_buckets(request, &chronicle)?;
            if let Some(window) = request.rolling_window {
                let series = rolling(&buckets, window)?;
                Ok(AnalysisOutput::AnnualCycleRolling {
                    frequency: request.frequency,
                    start_month: request.start_month,
                    cumulative: request.cumulative,
                    window,
                    series,
                })
            } else {
                Ok(AnalysisOutput::AnnualCycle {
                    frequency: request.frequency,
                    start_month: request.start_month,
                    cumulative: request.cumulative,
                    years: group_by_cycle_year(buckets),
                })
            }
        }
        AnalysisMode::Statistics => {
            let focus_year = request
                .focus_year
                .ok_or(ChronicleError::MissingFocusYear)?;
            if request.rolling_window.is_some() {
                warn!(target: TARGET, "rolling window is not applied in statistics mode");
            }
            let buckets = cycle_buckets(request, &chronicle)?;
            let rows = statistics(&buckets, focus_year)?;
            Ok(AnalysisOutput::Statistics {
                frequency: request.frequency,
                start_month: request.start_month,
                cumulative: request.cumulative,
                focus_year,
                rows,
            })
        }
    }
}

fn cycle_buckets(
    request: &AnalysisRequest,
    chronicle: &crate::chronicle::series::Chronicle,
) -> Result<Vec<Bucket>, ChronicleError> {
    let points = map_to_cycle(chronicle, request.start_month)?;
    let mut buckets = resample(&points, request.frequency);
    if request.cumulative {
        cumulative(&mut buckets);
    }
    Ok(buckets)
}

fn group_by_cycle_year(buckets: Vec<Bucket>) -> Vec<CycleYearSeries> {
    let mut years: Vec<CycleYearSeries> = Vec::new();
    for bucket in buckets {
        match years.last_mut() {
            Some(series) if series.cycle_year == bucket.cycle_year => {
                series.buckets.push(bucket);
            }
            _ => years.push(CycleYearSeries {
                cycle_year: bucket.cycle_year,
                buckets: vec![bucket],
            }),
        }
    }
    years
}
