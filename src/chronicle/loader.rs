//! CSV chronicle loading.

use std::{fs, path::Path};

use chrono::NaiveDate;

use crate::{
    chronicle::series::{Chronicle, Observation},
    lib::errors::ChronicleError,
};

/// How dates are written in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateFormat {
    /// `DD/MM/YYYY`
    DayFirst,
    /// `MM/DD/YYYY`
    MonthFirst,
    /// `YYYY-MM-DD`
    Iso,
    /// A strftime pattern such as `%d-%m-%Y`.
    Custom(String),
}

impl DateFormat {
    fn pattern(&self) -> &str {
        match self {
            DateFormat::DayFirst => "%d/%m/%Y",
            DateFormat::MonthFirst => "%m/%d/%Y",
            DateFormat::Iso => "%Y-%m-%d",
            DateFormat::Custom(pattern) => pattern,
        }
    }

    /// Parse a single date cell.
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), self.pattern()).ok()
    }
}

/// Load a chronicle from a CSV file.
///
/// The `;` separator is tried first; when it yields a single column the file
/// is re-read with `,`. Empty and non-finite value cells (`nan`, `inf`)
/// become gaps (later interpolated), unparseable dates or numbers are errors
/// carrying the record number.
pub fn load_chronicle(
    path: &Path,
    time_col: &str,
    value_col: &str,
    format: &DateFormat,
) -> Result<Chronicle, ChronicleError> {
    let raw = fs::read(path).map_err(|source| ChronicleError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = reader_with_delimiter(&raw, b';');
    let headers = read_headers(&mut reader, path)?;
    let (reader, headers) = if headers.len() <= 1 {
        let mut retry = reader_with_delimiter(&raw, b',');
        let headers = read_headers(&mut retry, path)?;
        (retry, headers)
    } else {
        (reader, headers)
    };

    if headers.len() < 2 {
        return Err(ChronicleError::TooFewColumns {
            found: headers.len(),
        });
    }

    let time_idx = column_index(&headers, time_col)?;
    let value_idx = column_index(&headers, value_col)?;

    let mut observations = Vec::new();
    let mut reader = reader;
    for (record_number, record) in reader.records().enumerate() {
        let record_number = record_number as u64 + 1;
        let record = record.map_err(|source| ChronicleError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let date_cell = record.get(time_idx).unwrap_or_default();
        let date = format
            .parse(date_cell)
            .ok_or_else(|| ChronicleError::InvalidDate {
                value: date_cell.to_string(),
                record: record_number,
            })?;

        let value_cell = record.get(value_idx).unwrap_or_default().trim();
        if value_cell.is_empty() {
            continue;
        }
        let value = value_cell
            .parse::<f64>()
            .map_err(|_| ChronicleError::InvalidValue {
                value: value_cell.to_string(),
                record: record_number,
            })?;
        // `parse::<f64>` accepts literal nan/inf; those cells are missing
        // data in exported chronicles, not observations.
        if !value.is_finite() {
            continue;
        }

        observations.push(Observation { date, value });
    }

    Chronicle::new(time_col, value_col, observations)
}

fn reader_with_delimiter(raw: &[u8], delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(raw)
}

fn read_headers(
    reader: &mut csv::Reader<&[u8]>,
    path: &Path,
) -> Result<Vec<String>, ChronicleError> {
    Ok(reader
        .headers()
        .map_err(|source| ChronicleError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(|field| field.to_string())
        .collect())
}

fn column_index(headers: &[String], name: &str) -> Result<usize, ChronicleError> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| ChronicleError::ColumnNotFound {
            name: name.to_string(),
        })
}
