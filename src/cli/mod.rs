//! CLI entrypoint module structure.
use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde_json::json;

use crate::{
    chronicle::run_analysis,
    config::LauncherConfig,
    launcher::{ensure_port_available, LaunchProbe, SystemLaunchProbe},
    lib::paths,
};

pub mod args;
pub mod profile;

pub use args::{AnalyzeArgs, CliCommand, FreqArg, LaunchProfileArgs, ModeArg, ParsedCommand};
pub use profile::{build_launch_args, resolve_config_path, LaunchProfile};

/// Result payload of a utility command.
#[derive(Debug)]
pub struct CliOutcome {
    pub payload: String,
    pub success: bool,
}

/// Execute CLI command mode and return a user-facing result payload.
pub fn execute_cli_command(command: CliCommand, config_path: &Path) -> Result<CliOutcome> {
    match command {
        CliCommand::Check => run_check(config_path, &SystemLaunchProbe),
        CliCommand::Analyze(analyze) => run_analyze(analyze),
    }
}

/// Run every launch precondition and format a JSON report.
///
/// Unlike the launch preflight this does not stop at the first failure:
/// the report covers all checks so a broken setup is fixed in one pass.
fn run_check(config_path: &Path, probe: &dyn LaunchProbe) -> Result<CliOutcome> {
    let config = LauncherConfig::load_from_path(config_path.to_path_buf())
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    let root = &config.toolchain.root;
    let env_prefix = paths::environment_prefix(root, &config.environment.name);
    let app_binary = paths::app_binary(&env_prefix);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let port_free = ensure_port_available(&config.server.host, config.server.port).is_ok();
    let checks = [
        ("toolchain_root", probe.dir_exists(root), root.display().to_string()),
        (
            "environment",
            probe.dir_exists(&env_prefix),
            env_prefix.display().to_string(),
        ),
        (
            "entry_script",
            probe.file_exists(&config.app.entry_script),
            config.app.entry_script.display().to_string(),
        ),
        (
            "app_binary",
            probe.file_exists(&app_binary),
            app_binary.display().to_string(),
        ),
        ("port", port_free, addr),
    ];

    let success = checks.iter().all(|(_, passed, _)| *passed);
    let payload = json!({
        "status": if success { "passed" } else { "failed" },
        "config": config_path.to_string_lossy(),
        "checks": checks
            .iter()
            .map(|(name, passed, detail)| json!({
                "name": name,
                "status": if *passed { "ok" } else { "failed" },
                "detail": detail,
            }))
            .collect::<Vec<_>>(),
    });

    Ok(CliOutcome {
        payload: serde_json::to_string_pretty(&payload)?,
        success,
    })
}

/// Run a chronicle analysis and deliver the JSON result.
fn run_analyze(analyze: AnalyzeArgs) -> Result<CliOutcome> {
    let output_path = analyze.output.clone();
    let request = analyze.into_request();
    let output = run_analysis(&request)
        .with_context(|| format!("analysis of {} failed", request.input.display()))?;
    let rendered = serde_json::to_string_pretty(&output)?;

    let payload = match output_path {
        Some(path) => {
            fs::write(&path, rendered.as_bytes())
                .with_context(|| format!("failed to write results to {}", path.display()))?;
            serde_json::to_string_pretty(&json!({
                "status": "written",
                "path": path.to_string_lossy(),
            }))?
        }
        None => rendered,
    };

    Ok(CliOutcome {
        payload,
        success: true,
    })
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        path::{Path, PathBuf},
    };

    use super::*;

    struct FakeProbe {
        dirs: HashSet<PathBuf>,
        files: HashSet<PathBuf>,
    }

    impl LaunchProbe for FakeProbe {
        fn dir_exists(&self, path: &Path) -> bool {
            self.dirs.contains(path)
        }

        fn file_exists(&self, path: &Path) -> bool {
            self.files.contains(path)
        }
    }

    fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    fn complete_probe() -> FakeProbe {
        let mut dirs = HashSet::new();
        dirs.insert(PathBuf::from("/opt/miniconda3"));
        dirs.insert(PathBuf::from("/opt/miniconda3/envs/bbapp"));
        let mut files = HashSet::new();
        files.insert(PathBuf::from("/srv/bbapp/Home.py"));
        files.insert(paths::app_binary(Path::new("/opt/miniconda3/envs/bbapp")));
        FakeProbe { dirs, files }
    }

    #[test]
    fn check_passes_when_every_precondition_holds() {
        let outcome = run_check(&fixture_path("bbapp_valid.toml"), &complete_probe())
            .expect("check should produce a report");

        assert!(outcome.success);
        assert!(
            outcome.payload.contains("\"status\": \"passed\""),
            "payload: {}",
            outcome.payload
        );
    }

    #[test]
    fn check_reports_every_failure_not_just_the_first() {
        let probe = FakeProbe {
            dirs: HashSet::new(),
            files: HashSet::new(),
        };
        let outcome = run_check(&fixture_path("bbapp_valid.toml"), &probe)
            .expect("check should produce a report");

        assert!(!outcome.success);
        assert!(
            outcome.payload.contains("toolchain_root"),
            "payload: {}",
            outcome.payload
        );
        assert!(
            outcome.payload.contains("entry_script"),
            "payload: {}",
            outcome.payload
        );
        // Overall status plus the four filesystem checks.
        assert!(outcome.payload.matches("\"failed\"").count() >= 5);
    }

    #[test]
    fn check_surfaces_a_missing_config_file() {
        let error = run_check(&fixture_path("does_not_exist.toml"), &complete_probe())
            .expect_err("missing config should error");
        assert!(error.to_string().contains("does_not_exist.toml"));
    }
}
