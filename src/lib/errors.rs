use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Errors that can occur while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to build (read) the configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize TOML into a struct.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Required field is missing.
    #[error("Configuration file {path} is missing `{field}`")]
    MissingField { path: PathBuf, field: &'static str },
    /// Field failed validation.
    #[error("Configuration file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }
}

/// Per-step failures of the launch sequence.
///
/// Each variant maps to one launch step so a failed launch names the step
/// that broke instead of surfacing an opaque tool diagnostic.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Toolchain root {path} does not exist")]
    ToolchainNotFound { path: PathBuf },
    #[error("Environment `{name}` not found under {path}")]
    EnvironmentNotFound { name: String, path: PathBuf },
    #[error("Entry script {path} does not exist or is not a file")]
    EntryScriptNotFound { path: PathBuf },
    #[error("Dashboard executable {path} not found in the environment")]
    AppBinaryNotFound { path: PathBuf },
    #[error("Address {addr} is not bindable: {source}")]
    PortUnavailable {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Server process exited before becoming reachable (exit={exit_code:?})")]
    ServerExited { exit_code: Option<i32> },
    #[error("Server did not become reachable at {addr} within {duration_secs} seconds")]
    StartupTimeout { addr: String, duration_secs: u64 },
    #[error("Failed to open browser: {message}")]
    Browser { message: String },
}

/// Errors occurring while loading or transforming chronicles.
#[derive(Debug, Error)]
pub enum ChronicleError {
    #[error("I/O failed for file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Column `{name}` not found in CSV header")]
    ColumnNotFound { name: String },
    #[error("CSV has {found} column(s); at least two are required")]
    TooFewColumns { found: usize },
    #[error("Record {record}: cannot parse `{value}` as a date")]
    InvalidDate { value: String, record: u64 },
    #[error("Record {record}: cannot parse `{value}` as a number")]
    InvalidValue { value: String, record: u64 },
    #[error("Chronicle contains no observations after filtering")]
    EmptySeries,
    #[error("Start month {month} is out of range (1-12)")]
    InvalidStartMonth { month: u32 },
    #[error("Rolling window of {window} years exceeds the {years} year(s) available")]
    WindowTooLarge { window: usize, years: usize },
    #[error("Statistics mode requires a focus year")]
    MissingFocusYear,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn launch_errors_name_the_failing_step() {
        let err = LaunchError::EnvironmentNotFound {
            name: "bbapp".into(),
            path: PathBuf::from("/opt/miniconda3/envs/bbapp"),
        };
        assert_eq!(
            err.to_string(),
            "Environment `bbapp` not found under /opt/miniconda3/envs/bbapp"
        );

        let err = LaunchError::StartupTimeout {
            addr: "127.0.0.1:8501".into(),
            duration_secs: 30,
        };
        assert!(err.to_string().contains("127.0.0.1:8501"));
        assert!(err.to_string().contains("30 seconds"));
    }

    #[test]
    fn chronicle_errors_carry_record_numbers() {
        let err = ChronicleError::InvalidDate {
            value: "31/31/2020".into(),
            record: 7,
        };
        assert_eq!(
            err.to_string(),
            "Record 7: cannot parse `31/31/2020` as a date"
        );
    }
}
