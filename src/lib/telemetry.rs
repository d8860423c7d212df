//! Telemetry initialization and launch session span helpers.

use std::time::Instant;

use anyhow::Result;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Initialize `tracing` and format developer logs.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper to record start and finish of a launch session.
pub struct LaunchSpan {
    span: Span,
    started_at: Instant,
    launch_id: Uuid,
}

impl LaunchSpan {
    /// Start a launch session span.
    pub fn start(launch_id: Uuid) -> Self {
        let span = info_span!(
            target: "bbapp::launcher",
            "launch_session",
            %launch_id
        );
        Self {
            span,
            started_at: Instant::now(),
            launch_id,
        }
    }

    /// Close the span while recording status and the server exit code.
    pub fn finish(self, status: &'static str, exit_code: Option<i32>) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "bbapp::launcher",
            launch_id = %self.launch_id,
            status = status,
            exit_code = exit_code,
            elapsed_ms = elapsed_ms,
            "Completed launch session"
        );
    }
}

/// Payload for logging the resolved launch profile as structured telemetry.
#[derive(Debug)]
pub struct LaunchProfileTelemetry<'a> {
    pub config_path: &'a str,
    pub environment: &'a str,
    pub entry_script: &'a str,
    pub host: &'a str,
    pub port: u16,
    pub open_browser: bool,
    pub launch_args: &'a [String],
}

/// Emit the launch profile to `tracing`.
pub fn emit_launch_profile(telemetry: &LaunchProfileTelemetry<'_>) {
    info!(
        target: "bbapp::runtime",
        config_path = telemetry.config_path,
        environment = telemetry.environment,
        entry_script = telemetry.entry_script,
        host = telemetry.host,
        port = telemetry.port,
        open_browser = telemetry.open_browser,
        launch_args = ?telemetry.launch_args,
        "Resolved launch profile"
    );
}
