//! Chronicle storage: sorted daily observations with gap filling.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::lib::errors::ChronicleError;

/// One dated measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// A time series of daily observations, sorted by date.
#[derive(Debug, Clone)]
pub struct Chronicle {
    time_label: String,
    value_label: String,
    observations: Vec<Observation>,
}

impl Chronicle {
    /// Build a chronicle from unsorted observations.
    ///
    /// Observations are sorted by date; duplicate dates keep the last value.
    pub fn new(
        time_label: &str,
        value_label: &str,
        mut observations: Vec<Observation>,
    ) -> Result<Self, ChronicleError> {
        if observations.is_empty() {
            return Err(ChronicleError::EmptySeries);
        }
        // Stable sort keeps input order within a date, so the last row of a
        // duplicate run is the later one.
        observations.sort_by_key(|obs| obs.date);
        let mut deduped: Vec<Observation> = Vec::with_capacity(observations.len());
        for obs in observations {
            match deduped.last_mut() {
                Some(last) if last.date == obs.date => *last = obs,
                _ => deduped.push(obs),
            }
        }

        Ok(Self {
            time_label: time_label.to_string(),
            value_label: value_label.to_string(),
            observations: deduped,
        })
    }

    pub fn time_label(&self) -> &str {
        &self.time_label
    }

    pub fn value_label(&self) -> &str {
        &self.value_label
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// First and last calendar year with data.
    pub fn year_span(&self) -> (i32, i32) {
        let first = self.observations.first().map(|obs| obs.date.year());
        let last = self.observations.last().map(|obs| obs.date.year());
        (first.unwrap_or_default(), last.unwrap_or_default())
    }

    /// Restrict to an inclusive calendar-year range.
    pub fn filter_years(
        &self,
        year_min: Option<i32>,
        year_max: Option<i32>,
    ) -> Result<Self, ChronicleError> {
        let observations: Vec<Observation> = self
            .observations
            .iter()
            .copied()
            .filter(|obs| {
                let year = obs.date.year();
                year_min.map_or(true, |bound| year >= bound)
                    && year_max.map_or(true, |bound| year <= bound)
            })
            .collect();

        Self::new(&self.time_label, &self.value_label, observations)
    }

    /// Years fully covered from January 1st to December 31st.
    pub fn complete_years(&self) -> Vec<i32> {
        let mut years = Vec::new();
        let mut current: Option<(i32, NaiveDate, NaiveDate)> = None;

        for obs in &self.observations {
            let year = obs.date.year();
            match current.as_mut() {
                Some((y, _, last)) if *y == year => *last = obs.date,
                _ => {
                    if let Some(entry) = current.take() {
                        push_if_complete(&mut years, entry);
                    }
                    current = Some((year, obs.date, obs.date));
                }
            }
        }
        if let Some(entry) = current {
            push_if_complete(&mut years, entry);
        }

        years
    }

    /// Reindex to a continuous daily grid over the complete-year span,
    /// linearly interpolating interior gaps.
    ///
    /// When no year is complete the chronicle is returned unchanged, matching
    /// the original behavior of skipping the reindex entirely.
    pub fn fill_daily(&self) -> Result<Self, ChronicleError> {
        let complete = self.complete_years();
        let (Some(first_year), Some(last_year)) = (complete.first(), complete.last()) else {
            return Ok(self.clone());
        };

        let start = NaiveDate::from_ymd_opt(*first_year, 1, 1).expect("January 1st exists");
        let end = NaiveDate::from_ymd_opt(*last_year, 12, 31).expect("December 31st exists");

        let in_range: Vec<Observation> = self
            .observations
            .iter()
            .copied()
            .filter(|obs| obs.date >= start && obs.date <= end)
            .collect();

        let mut filled = Vec::new();
        for window in in_range.windows(2) {
            let (left, right) = (window[0], window[1]);
            filled.push(left);
            let gap = (right.date - left.date).num_days();
            for offset in 1..gap {
                let date = left.date + chrono::Duration::days(offset);
                let fraction = offset as f64 / gap as f64;
                let value = left.value + (right.value - left.value) * fraction;
                filled.push(Observation { date, value });
            }
        }
        if let Some(last) = in_range.last() {
            filled.push(*last);
        }

        Self::new(&self.time_label, &self.value_label, filled)
    }
}

fn push_if_complete(years: &mut Vec<i32>, (year, first, last): (i32, NaiveDate, NaiveDate)) {
    if first.month() == 1 && first.day() == 1 && last.month() == 12 && last.day() == 31 {
        years.push(year);
    }
}
