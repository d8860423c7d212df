//! LaunchProfile and config path resolution.
use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

const DEFAULT_CONFIG: &str = "bbapp.toml";
const CONFIG_ENV: &str = "BBAPP_CONFIG_PATH";

/// Resolved launch profile.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    pub config_path: PathBuf,
    pub launch_args: Vec<String>,
}

/// Resolve config path in the order: CLI override → env var → default.
pub fn resolve_config_path(override_path: Option<PathBuf>) -> Result<PathBuf> {
    let path = override_path
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    if path.is_absolute() {
        return Ok(path);
    }

    let cwd = env::current_dir().context("failed to obtain current directory")?;
    Ok(cwd.join(path))
}

/// Build launch arguments suitable for reproduction/logging.
pub fn build_launch_args(config: &Path) -> Vec<String> {
    vec![format!("--config={}", config.display())]
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn absolute_override_is_kept_verbatim() {
        let path = resolve_config_path(Some(PathBuf::from("/etc/bbapp/bbapp.toml")))
            .expect("absolute path resolves");
        assert_eq!(path, PathBuf::from("/etc/bbapp/bbapp.toml"));
    }

    #[test]
    fn relative_override_is_anchored_to_the_working_directory() {
        let path = resolve_config_path(Some(PathBuf::from("configs/bbapp.toml")))
            .expect("relative path resolves");
        assert!(path.is_absolute());
        assert!(path.ends_with("configs/bbapp.toml"));
    }

    #[test]
    fn launch_args_round_trip_the_config_path() {
        let args = build_launch_args(Path::new("/etc/bbapp/bbapp.toml"));
        assert_eq!(args, vec!["--config=/etc/bbapp/bbapp.toml".to_string()]);
    }
}
