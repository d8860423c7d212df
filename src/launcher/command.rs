//! Shared helpers for building the dashboard server command.
//!
//! The child gets an explicit environment map instead of an activated shell:
//! the parent process environment is never mutated, so nothing leaks past the
//! launch and nothing is left activated when the launcher exits.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use tokio::process::Command;

use crate::lib::paths;

pub struct AppCommandConfig<'a> {
    pub app_binary: &'a Path,
    pub toolchain_root: &'a Path,
    pub env_prefix: &'a Path,
    pub environment_name: &'a str,
}

pub struct AppCommandRequest<'a> {
    pub entry_script: &'a Path,
    pub host: &'a str,
    pub port: u16,
}

/// Build the dashboard server command with a pinned environment.
pub fn build_app_command(
    config: AppCommandConfig<'_>,
    request: AppCommandRequest<'_>,
) -> Command {
    let mut command = Command::new(config.app_binary);
    command.kill_on_drop(true);
    command.env_clear();
    command.env(
        "PATH",
        launch_path(config.env_prefix, config.toolchain_root),
    );
    command.env("CONDA_PREFIX", config.env_prefix);
    command.env("CONDA_DEFAULT_ENV", config.environment_name);
    command.env("PYTHONUNBUFFERED", "1");
    if let Some(home) = env::var_os(HOME_ENV) {
        command.env(HOME_ENV, home);
    }

    command.arg("run").arg(request.entry_script);
    // The served address is part of the request, not an assumption: the child
    // binds exactly what the readiness probe will poll.
    command.arg("--server.address").arg(request.host);
    command.arg("--server.port").arg(request.port.to_string());
    command.arg("--server.headless").arg("true");

    command
}

#[cfg(not(windows))]
const HOME_ENV: &str = "HOME";
#[cfg(windows)]
const HOME_ENV: &str = "USERPROFILE";

/// PATH for the child: environment bin, toolchain bin, then system defaults.
fn launch_path(env_prefix: &Path, toolchain_root: &Path) -> OsString {
    let mut entries = vec![paths::bin_dir(env_prefix), paths::bin_dir(toolchain_root)];
    entries.extend(system_path_entries());
    env::join_paths(entries).unwrap_or_else(|_| paths::bin_dir(env_prefix).into_os_string())
}

#[cfg(not(windows))]
fn system_path_entries() -> Vec<PathBuf> {
    vec![PathBuf::from("/usr/bin"), PathBuf::from("/bin")]
}

#[cfg(windows)]
fn system_path_entries() -> Vec<PathBuf> {
    env::var_os("SystemRoot")
        .map(|root| {
            let root = PathBuf::from(root);
            vec![root.join("System32"), root]
        })
        .unwrap_or_default()
}
