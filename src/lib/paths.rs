//! Shared helpers reused across modules (path validation, conda layout).

use std::path::{Path, PathBuf};

/// Returns true if the path is non-empty and absolute.
pub fn is_nonempty_absolute(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.is_absolute()
}

/// Prefix directory of a named environment under a conda-style toolchain root.
pub fn environment_prefix(toolchain_root: &Path, name: &str) -> PathBuf {
    toolchain_root.join("envs").join(name)
}

/// Executable directory of an environment prefix.
#[cfg(not(windows))]
pub fn bin_dir(prefix: &Path) -> PathBuf {
    prefix.join("bin")
}

/// Executable directory of an environment prefix.
#[cfg(windows)]
pub fn bin_dir(prefix: &Path) -> PathBuf {
    prefix.join("Scripts")
}

/// Name of the dashboard server executable on this platform.
#[cfg(not(windows))]
pub const APP_BINARY_NAME: &str = "streamlit";

/// Name of the dashboard server executable on this platform.
#[cfg(windows)]
pub const APP_BINARY_NAME: &str = "streamlit.exe";

/// Full path of the dashboard server executable inside an environment.
pub fn app_binary(prefix: &Path) -> PathBuf {
    bin_dir(prefix).join(APP_BINARY_NAME)
}
