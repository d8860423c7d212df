//! Ordered launch sequence: preflight, spawn, readiness, browser, supervise.

use std::{process::ExitCode, time::Duration};

use anyhow::Error;
use tokio::signal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    cli::LaunchProfile,
    config::LauncherConfig,
    launcher::{
        browser,
        command::{build_app_command, AppCommandConfig, AppCommandRequest},
        probe::{self, SystemLaunchProbe},
    },
    lib::telemetry::{emit_launch_profile, LaunchProfileTelemetry, LaunchSpan},
};

/// Bundles a runtime error message with an exit code.
#[derive(Debug)]
pub struct RuntimeExit {
    message: String,
    exit_code: ExitCode,
}

impl RuntimeExit {
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: format!("{err:?}"),
            exit_code: ExitCode::FAILURE,
        }
    }

    pub fn with_message(message: String) -> Self {
        Self {
            message,
            exit_code: ExitCode::FAILURE,
        }
    }

    pub fn report(self) -> ExitCode {
        eprintln!("{}", self.message);
        self.exit_code
    }
}

/// Run the full launch sequence against the resolved configuration.
pub async fn run_launch(profile: LaunchProfile, config: LauncherConfig) -> Result<(), RuntimeExit> {
    emit_launch_profile(&LaunchProfileTelemetry {
        config_path: config.source_path.to_string_lossy().as_ref(),
        environment: &config.environment.name,
        entry_script: config.app.entry_script.to_string_lossy().as_ref(),
        host: &config.server.host,
        port: config.server.port,
        open_browser: config.launcher.open_browser,
        launch_args: &profile.launch_args,
    });

    let resolved =
        probe::preflight(&config, &SystemLaunchProbe).map_err(RuntimeExit::from_error)?;
    probe::ensure_port_available(&config.server.host, config.server.port)
        .map_err(RuntimeExit::from_error)?;

    let span = LaunchSpan::start(Uuid::new_v4());

    let mut command = build_app_command(
        AppCommandConfig {
            app_binary: &resolved.app_binary,
            toolchain_root: &config.toolchain.root,
            env_prefix: &resolved.env_prefix,
            environment_name: &config.environment.name,
        },
        AppCommandRequest {
            entry_script: &config.app.entry_script,
            host: &config.server.host,
            port: config.server.port,
        },
    );

    info!(
        target: "bbapp::launcher",
        app_binary = %resolved.app_binary.display(),
        entry_script = %config.app.entry_script.display(),
        addr = %resolved.addr,
        "Spawning dashboard server"
    );

    // Stdio is inherited: diagnostics from the server reach the console verbatim.
    let mut child = command.spawn().map_err(|source| {
        RuntimeExit::from_error(crate::lib::errors::LaunchError::Spawn {
            program: resolved.app_binary.to_string_lossy().into_owned(),
            source,
        })
    })?;

    let startup_timeout = Duration::from_secs(config.server.startup_timeout_secs);
    let poll_interval = Duration::from_millis(config.server.poll_interval_ms);
    if let Err(err) =
        probe::wait_for_endpoint(&mut child, &resolved.addr, startup_timeout, poll_interval).await
    {
        let _ = child.kill().await;
        span.finish("failed", None);
        return Err(RuntimeExit::from_error(err));
    }

    info!(
        target: "bbapp::launcher",
        addr = %resolved.addr,
        "Server is reachable"
    );

    let url = browser::served_url(&config.server.host, config.server.port);
    if config.launcher.open_browser {
        // Browser failure does not take down a healthy server.
        if let Err(err) = browser::open_in_browser(&url) {
            warn!(
                target: "bbapp::launcher",
                url = %url,
                reason = %err,
                "Could not open the browser; open the URL manually"
            );
        }
    } else {
        info!(target: "bbapp::launcher", url = %url, "Dashboard is serving");
    }

    supervise(child, span).await
}

/// Wait for the server to exit on its own or for the user to interrupt.
async fn supervise(
    mut child: tokio::process::Child,
    span: LaunchSpan,
) -> Result<(), RuntimeExit> {
    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(RuntimeExit::from_error)?;
            let exit_code = status.code();
            if status.success() {
                span.finish("completed", exit_code);
                Ok(())
            } else {
                span.finish("failed", exit_code);
                Err(RuntimeExit::with_message(format!(
                    "Dashboard server exited with {status}"
                )))
            }
        }
        _ = signal::ctrl_c() => {
            info!(target: "bbapp::launcher", "Interrupt received; stopping the server");
            let _ = child.kill().await;
            let _ = child.wait().await;
            span.finish("interrupted", None);
            Ok(())
        }
    }
}
