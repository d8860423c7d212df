//! Load and validate launcher configuration.
use std::{env, path::PathBuf};

use serde::Deserialize;
use tracing::{error, info};

use crate::lib::errors::ConfigError;

pub mod app;
pub mod server;
pub mod telemetry;
pub mod toolchain;

pub use app::{
    parse_app_section, parse_launcher_section, AppSection, LauncherSection, RawAppSection,
    RawLauncherSection,
};
pub use server::{
    parse_server_section, RawServerSection, ServerSection, DEFAULT_HOST, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_PORT, DEFAULT_STARTUP_TIMEOUT_SECS,
};
pub use toolchain::{
    parse_environment_section, parse_toolchain_section, EnvironmentSection, RawEnvironmentSection,
    RawToolchainSection, ToolchainSection,
};

const CONFIG_ENV_KEY: &str = "BBAPP_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "bbapp.toml";

/// Top-level configuration container.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    pub toolchain: ToolchainSection,
    pub environment: EnvironmentSection,
    pub app: AppSection,
    pub server: ServerSection,
    pub launcher: LauncherSection,
    pub source_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RawLauncherConfig {
    toolchain: Option<RawToolchainSection>,
    environment: Option<RawEnvironmentSection>,
    app: Option<RawAppSection>,
    server: Option<RawServerSection>,
    launcher: Option<RawLauncherSection>,
}

impl LauncherConfig {
    /// Prefer `BBAPP_CONFIG_PATH` if set; otherwise read `bbapp.toml`.
    pub fn load_from_env_or_default() -> Result<Self, ConfigError> {
        let (path, from_env) = match env::var(CONFIG_ENV_KEY) {
            Ok(value) if !value.trim().is_empty() => (PathBuf::from(value), true),
            _ => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        telemetry::log_env_source(&path, from_env);
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        info!(
            target: "bbapp::config",
            path = %path.display(),
            "Starting configuration load"
        );

        let builder = config::Config::builder().add_source(config::File::from(path.clone()));
        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(path.clone(), err);
            error!(
                target: "bbapp::config",
                path = %path.display(),
                reason = %error,
                "Failed to read configuration file"
            );
            error
        })?;

        let raw: RawLauncherConfig = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "bbapp::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse configuration file"
            );
            error
        })?;

        let config = Self::from_raw(raw, path.clone()).map_err(|err| {
            error!(
                target: "bbapp::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate configuration file"
            );
            err
        })?;

        telemetry::log_loaded(&config);
        Ok(config)
    }

    fn from_raw(raw: RawLauncherConfig, path: PathBuf) -> Result<Self, ConfigError> {
        let toolchain = parse_toolchain_section(raw.toolchain, &path)?;
        let environment = parse_environment_section(raw.environment, &path)?;
        let app = parse_app_section(raw.app, &path)?;
        let server = parse_server_section(raw.server, &path)?;
        let launcher = parse_launcher_section(raw.launcher, &path)?;

        Ok(Self {
            toolchain,
            environment,
            app,
            server,
            launcher,
            source_path: path,
        })
    }
}
