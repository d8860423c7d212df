use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::{errors::ConfigError, paths::is_nonempty_absolute};

/// Entry script the dashboard server is pointed at.
#[derive(Debug, Clone)]
pub struct AppSection {
    pub entry_script: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawAppSection {
    pub entry_script: Option<PathBuf>,
}

/// Launcher behavior toggles.
#[derive(Debug, Clone)]
pub struct LauncherSection {
    pub open_browser: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawLauncherSection {
    pub open_browser: Option<bool>,
}

pub fn parse_app_section(raw: Option<RawAppSection>, path: &Path) -> Result<AppSection, ConfigError> {
    let entry_script = raw
        .and_then(|section| section.entry_script)
        .ok_or(ConfigError::MissingField {
            path: path.to_path_buf(),
            field: "app.entry_script",
        })?;

    if !is_nonempty_absolute(&entry_script) {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "app.entry_script",
            message: "Use an absolute path to the dashboard entry script".into(),
        });
    }

    Ok(AppSection { entry_script })
}

pub fn parse_launcher_section(
    raw: Option<RawLauncherSection>,
    _path: &Path,
) -> Result<LauncherSection, ConfigError> {
    let launcher_raw = raw.unwrap_or_default();
    Ok(LauncherSection {
        open_browser: launcher_raw.open_browser.unwrap_or(true),
    })
}
