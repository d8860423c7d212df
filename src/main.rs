//! Entry point for the BB dashboard launcher.
use std::{path::Path, process::ExitCode};

use anyhow::Error;
use bbapp::{
    cli::{execute_cli_command, CliCommand, LaunchProfileArgs, ParsedCommand},
    config::LauncherConfig,
    launcher::{run_launch, RuntimeExit},
    lib::telemetry,
};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<(), RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let args = LaunchProfileArgs::parse();
    let command = args.into_command().map_err(RuntimeExit::from_error)?;

    match command {
        ParsedCommand::RunLaunch(profile) => launch(profile).await,
        ParsedCommand::Cli {
            command,
            config_path,
        } => handle_cli_command(command, &config_path),
    }
}

async fn launch(profile: bbapp::cli::LaunchProfile) -> Result<(), RuntimeExit> {
    let config = LauncherConfig::load_from_path(profile.config_path.clone())
        .map_err(|err| RuntimeExit::from_error(Error::new(err)))?;
    run_launch(profile, config).await
}

fn handle_cli_command(command: CliCommand, config_path: &Path) -> Result<(), RuntimeExit> {
    let outcome = execute_cli_command(command, config_path).map_err(RuntimeExit::from_error)?;
    println!("{}", outcome.payload);
    if outcome.success {
        Ok(())
    } else {
        Err(RuntimeExit::with_message(
            "one or more launch checks failed".to_string(),
        ))
    }
}
