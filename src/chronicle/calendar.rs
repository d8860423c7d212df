//! Cycle calendar: 365-day normalization and hydrological-year mapping.
//!
//! Every date is projected onto a fixed 365-day cycle: February 29th is
//! dropped and later days of leap years shift back by one, so day N always
//! means the same calendar position. Weeks are 7-day blocks counted from the
//! cycle start, with the 365th day folded into week 52.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{chronicle::series::Chronicle, lib::errors::ChronicleError};

/// Days in each month of the normalized (non-leap) year.
const DAYS_PER_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
/// Cumulative day count before each month in the normalized year.
const CUMULATIVE_DAYS: [u32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// An observation positioned on the annual cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CyclePoint {
    pub date: NaiveDate,
    /// Cycle year the observation belongs to (shifted when the cycle does
    /// not start in January).
    pub cycle_year: i32,
    /// Day of the cycle, 1..=365.
    pub day: u32,
    /// Week of the cycle, 1..=52.
    pub week: u32,
    /// Month position within the cycle, 1..=12.
    pub month: u32,
    pub value: f64,
}

/// Project a chronicle onto the annual cycle starting at `start_month`.
///
/// `start_month == 1` keeps the calendar year. For later start months the
/// chronicle is trimmed to whole cycles and the cycle year is reassigned:
/// with an early start month (through June) the cycle keeps the label of its
/// final calendar year, with a late one (July onward) months at or after the
/// start belong to the next year's cycle.
pub fn map_to_cycle(
    chronicle: &Chronicle,
    start_month: u32,
) -> Result<Vec<CyclePoint>, ChronicleError> {
    if !(1..=12).contains(&start_month) {
        return Err(ChronicleError::InvalidStartMonth { month: start_month });
    }

    let window = cycle_window(chronicle, start_month);

    let mut points = Vec::new();
    for obs in chronicle.observations() {
        let date = obs.date;
        if date.month() == 2 && date.day() == 29 {
            continue;
        }
        if let Some((start, end)) = window {
            if date < start || date > end {
                continue;
            }
        }

        let mut doy = date.ordinal();
        if date.leap_year() && doy > 59 {
            doy -= 1;
        }

        let (cycle_year, day, month) = if start_month == 1 {
            (date.year(), doy, date.month())
        } else {
            let month = date.month();
            let cycle_year = if start_month <= 6 {
                if month < start_month {
                    date.year() - 1
                } else {
                    date.year()
                }
            } else if month >= start_month {
                date.year() + 1
            } else {
                date.year()
            };

            let offset = CUMULATIVE_DAYS[start_month as usize - 1];
            let day = if doy > offset {
                doy - offset
            } else {
                doy + 365 - offset
            };
            let month_position =
                ((month as i64 - start_month as i64).rem_euclid(12)) as u32 + 1;
            (cycle_year, day, month_position)
        };

        points.push(CyclePoint {
            date,
            cycle_year,
            day,
            week: week_of_day(day),
            month,
            value: obs.value,
        });
    }

    points.sort_by_key(|point| (point.cycle_year, point.day));
    Ok(points)
}

/// Week number of a cycle day: 7-day blocks, last block absorbs day 365.
pub fn week_of_day(day: u32) -> u32 {
    (((day - 1) / 7) + 1).min(52)
}

/// Whole-cycle window for a shifted start month, `None` for calendar years.
fn cycle_window(chronicle: &Chronicle, start_month: u32) -> Option<(NaiveDate, NaiveDate)> {
    if start_month == 1 {
        return None;
    }

    let (first_year, last_year) = chronicle.year_span();
    let end_month = start_month - 1;
    let start = NaiveDate::from_ymd_opt(first_year, start_month, 1)?;
    let end = NaiveDate::from_ymd_opt(last_year, end_month, DAYS_PER_MONTH[end_month as usize - 1])?;
    Some((start, end))
}
