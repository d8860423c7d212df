use std::path::Path;

use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Served address and readiness probe settings.
#[derive(Debug, Clone)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub startup_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub startup_timeout_secs: Option<u64>,
    pub poll_interval_ms: Option<u64>,
}

pub fn parse_server_section(
    raw: Option<RawServerSection>,
    path: &Path,
) -> Result<ServerSection, ConfigError> {
    let server_raw = raw.unwrap_or_default();
    let host = server_raw.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server_raw.port.unwrap_or(DEFAULT_PORT);
    validate_port(port, path)?;

    let startup_timeout_secs = server_raw
        .startup_timeout_secs
        .unwrap_or(DEFAULT_STARTUP_TIMEOUT_SECS);
    if startup_timeout_secs == 0 {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "server.startup_timeout_secs",
            message: "Startup timeout must be at least one second".into(),
        });
    }

    let poll_interval_ms = server_raw
        .poll_interval_ms
        .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
    if poll_interval_ms == 0 {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "server.poll_interval_ms",
            message: "Poll interval must be at least one millisecond".into(),
        });
    }

    Ok(ServerSection {
        host,
        port,
        startup_timeout_secs,
        poll_interval_ms,
    })
}

fn validate_port(port: u16, path: &Path) -> Result<(), ConfigError> {
    if (1024..=65535).contains(&port) {
        return Ok(());
    }

    Err(ConfigError::InvalidField {
        path: path.to_path_buf(),
        field: "server.port",
        message: "Use a port in the range 1024-65535".into(),
    })
}
