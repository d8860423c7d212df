//! Preflight validation and server readiness probing.

use std::{
    net::TcpListener,
    path::{Path, PathBuf},
    time::Duration,
};

use tokio::{net::TcpStream, process::Child, time};
use tracing::debug;

use crate::{
    config::LauncherConfig,
    lib::{errors::LaunchError, paths},
};

/// Abstraction for filesystem access during preflight validation.
pub trait LaunchProbe {
    fn dir_exists(&self, path: &Path) -> bool;
    fn file_exists(&self, path: &Path) -> bool;
}

/// Probe that operates against the real filesystem.
pub struct SystemLaunchProbe;

impl LaunchProbe for SystemLaunchProbe {
    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Launch inputs resolved and validated by preflight.
#[derive(Debug, Clone)]
pub struct ResolvedLaunch {
    pub env_prefix: PathBuf,
    pub app_binary: PathBuf,
    pub addr: String,
}

/// Validate every launch precondition before anything is spawned.
///
/// Order matters and mirrors the launch sequence: toolchain root, named
/// environment, entry script, dashboard executable. A missing environment is
/// a hard error here; there is no fallthrough into the base environment.
pub fn preflight(
    config: &LauncherConfig,
    probe: &dyn LaunchProbe,
) -> Result<ResolvedLaunch, LaunchError> {
    let root = &config.toolchain.root;
    if !probe.dir_exists(root) {
        return Err(LaunchError::ToolchainNotFound { path: root.clone() });
    }

    let env_prefix = paths::environment_prefix(root, &config.environment.name);
    if !probe.dir_exists(&env_prefix) {
        return Err(LaunchError::EnvironmentNotFound {
            name: config.environment.name.clone(),
            path: env_prefix,
        });
    }

    if !probe.file_exists(&config.app.entry_script) {
        return Err(LaunchError::EntryScriptNotFound {
            path: config.app.entry_script.clone(),
        });
    }

    let app_binary = paths::app_binary(&env_prefix);
    if !probe.file_exists(&app_binary) {
        return Err(LaunchError::AppBinaryNotFound { path: app_binary });
    }

    Ok(ResolvedLaunch {
        env_prefix,
        app_binary,
        addr: format!("{}:{}", config.server.host, config.server.port),
    })
}

/// Check that the served address is still free to bind.
pub fn ensure_port_available(host: &str, port: u16) -> Result<(), LaunchError> {
    let addr = format!("{host}:{port}");
    match TcpListener::bind((host, port)) {
        Ok(listener) => {
            drop(listener);
            Ok(())
        }
        Err(source) => Err(LaunchError::PortUnavailable { addr, source }),
    }
}

/// Poll the served address until it accepts a TCP connection.
///
/// Races the probe against the child process: a child that dies during
/// startup surfaces as `ServerExited` instead of a timeout.
pub async fn wait_for_endpoint(
    child: &mut Child,
    addr: &str,
    startup_timeout: Duration,
    poll_interval: Duration,
) -> Result<(), LaunchError> {
    let deadline = time::Instant::now() + startup_timeout;

    loop {
        if let Ok(Some(status)) = child.try_wait() {
            return Err(LaunchError::ServerExited {
                exit_code: status.code(),
            });
        }

        match TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(err) => {
                debug!(
                    target: "bbapp::launcher",
                    addr = addr,
                    reason = %err,
                    "Server not reachable yet"
                );
            }
        }

        if time::Instant::now() >= deadline {
            return Err(LaunchError::StartupTimeout {
                addr: addr.to_string(),
                duration_secs: startup_timeout.as_secs(),
            });
        }
        time::sleep(poll_interval).await;
    }
}
