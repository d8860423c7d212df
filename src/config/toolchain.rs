use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::{errors::ConfigError, paths::is_nonempty_absolute};

/// Location of the environment-management toolchain installation.
#[derive(Debug, Clone)]
pub struct ToolchainSection {
    pub root: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawToolchainSection {
    pub root: Option<PathBuf>,
}

/// Named environment the dashboard runs in.
#[derive(Debug, Clone)]
pub struct EnvironmentSection {
    pub name: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawEnvironmentSection {
    pub name: Option<String>,
}

pub fn parse_toolchain_section(
    raw: Option<RawToolchainSection>,
    path: &Path,
) -> Result<ToolchainSection, ConfigError> {
    let root = raw
        .and_then(|section| section.root)
        .ok_or(ConfigError::MissingField {
            path: path.to_path_buf(),
            field: "toolchain.root",
        })?;

    if !is_nonempty_absolute(&root) {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "toolchain.root",
            message: "Use an absolute path to the conda installation".into(),
        });
    }

    Ok(ToolchainSection { root })
}

pub fn parse_environment_section(
    raw: Option<RawEnvironmentSection>,
    path: &Path,
) -> Result<EnvironmentSection, ConfigError> {
    let name = raw
        .and_then(|section| section.name)
        .ok_or(ConfigError::MissingField {
            path: path.to_path_buf(),
            field: "environment.name",
        })?;

    if name.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "environment.name",
            message: "Environment name must not be blank".into(),
        });
    }

    Ok(EnvironmentSection { name })
}
