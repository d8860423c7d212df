//! CLI argument definitions and `LaunchProfile` construction.
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use super::{build_launch_args, resolve_config_path, LaunchProfile};
use crate::chronicle::{AnalysisMode, AnalysisRequest, DateFormat, Frequency};

/// Parsed command intent from CLI.
#[derive(Debug, Clone)]
pub enum ParsedCommand {
    RunLaunch(LaunchProfile),
    Cli {
        command: CliCommand,
        config_path: PathBuf,
    },
}

/// Top-level optional CLI commands.
#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Validate the launch environment without starting the server.
    Check,
    /// Analyze a chronicle CSV and emit JSON results.
    Analyze(AnalyzeArgs),
}

/// Analysis modes accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ModeArg {
    Historical,
    AnnualCycle,
    Statistics,
}

impl From<ModeArg> for AnalysisMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Historical => AnalysisMode::Historical,
            ModeArg::AnnualCycle => AnalysisMode::AnnualCycle,
            ModeArg::Statistics => AnalysisMode::Statistics,
        }
    }
}

/// Resampling frequencies accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FreqArg {
    Daily,
    Weekly,
    Monthly,
}

impl From<FreqArg> for Frequency {
    fn from(freq: FreqArg) -> Self {
        match freq {
            FreqArg::Daily => Frequency::Daily,
            FreqArg::Weekly => Frequency::Weekly,
            FreqArg::Monthly => Frequency::Monthly,
        }
    }
}

/// Accepts the named formats or any strftime pattern containing `%`.
fn parse_date_format(raw: &str) -> Result<DateFormat, String> {
    match raw {
        "day-first" => Ok(DateFormat::DayFirst),
        "month-first" => Ok(DateFormat::MonthFirst),
        "iso" => Ok(DateFormat::Iso),
        pattern if pattern.contains('%') => Ok(DateFormat::Custom(pattern.to_string())),
        other => Err(format!(
            "unknown date format `{other}`: expected day-first, month-first, iso, \
             or a strftime pattern such as %d-%m-%Y"
        )),
    }
}

/// Arguments for `analyze`.
#[derive(Debug, Clone, Args)]
#[command(about = "Analyze a chronicle CSV and emit JSON results")]
pub struct AnalyzeArgs {
    /// Path to the chronicle CSV file.
    #[arg(long)]
    pub input: PathBuf,
    /// Header of the date column.
    #[arg(long)]
    pub time_col: String,
    /// Header of the value column.
    #[arg(long)]
    pub value_col: String,
    /// day-first, month-first, iso, or a strftime pattern.
    #[arg(long, value_parser = parse_date_format, default_value = "day-first")]
    pub date_format: DateFormat,
    /// What the analysis should produce.
    #[arg(long, value_enum, default_value_t = ModeArg::Historical)]
    pub mode: ModeArg,
    /// Resampling frequency over the annual cycle.
    #[arg(long, value_enum, default_value_t = FreqArg::Daily)]
    pub freq: FreqArg,
    /// First month of the annual cycle (1-12).
    #[arg(long, default_value_t = 1)]
    pub start_month: u32,
    /// Year compared against the historical distribution (statistics mode).
    #[arg(long)]
    pub focus_year: Option<i32>,
    /// Average this many consecutive cycle years per series (annual-cycle mode).
    #[arg(long)]
    pub rolling_window: Option<usize>,
    /// Accumulate values within each cycle year.
    #[arg(long, default_value_t = false)]
    pub cumulative: bool,
    /// Drop observations before this calendar year.
    #[arg(long)]
    pub year_min: Option<i32>,
    /// Drop observations after this calendar year.
    #[arg(long)]
    pub year_max: Option<i32>,
    /// Write results to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl AnalyzeArgs {
    /// Translate CLI flags into an analysis request.
    pub fn into_request(self) -> AnalysisRequest {
        AnalysisRequest {
            input: self.input,
            time_col: self.time_col,
            value_col: self.value_col,
            date_format: self.date_format,
            mode: self.mode.into(),
            frequency: self.freq.into(),
            start_month: self.start_month,
            focus_year: self.focus_year,
            rolling_window: self.rolling_window,
            cumulative: self.cumulative,
            year_min: self.year_min,
            year_max: self.year_max,
        }
    }
}

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Launcher and chronicle analyzer for the BB dashboard",
    long_about = None
)]
pub struct LaunchProfileArgs {
    /// Path to bbapp.toml (overrides BBAPP_CONFIG_PATH).
    #[arg(long = "config", global = true)]
    pub config_override: Option<PathBuf>,
    /// Optional CLI command mode.
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

impl LaunchProfileArgs {
    /// Build a `LaunchProfile` from CLI args and environment variables.
    pub fn build(self) -> Result<LaunchProfile> {
        let config_path = resolve_config_path(self.config_override)?;
        let launch_args = build_launch_args(&config_path);

        Ok(LaunchProfile {
            config_path,
            launch_args,
        })
    }

    /// Parse CLI args into either launch mode or utility command mode.
    pub fn into_command(self) -> Result<ParsedCommand> {
        match self.command {
            Some(command) => {
                let config_path = resolve_config_path(self.config_override)?;
                Ok(ParsedCommand::Cli {
                    command,
                    config_path,
                })
            }
            None => Ok(ParsedCommand::RunLaunch(self.build()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn bare_invocation_means_launch() {
        let args = LaunchProfileArgs::parse_from(["bbapp"]);
        let command = args.into_command().expect("parsing should succeed");
        assert!(matches!(command, ParsedCommand::RunLaunch(_)));
    }

    #[test]
    fn analyze_flags_map_onto_the_request() {
        let args = LaunchProfileArgs::parse_from([
            "bbapp",
            "analyze",
            "--input",
            "/data/volumes.csv",
            "--time-col",
            "time",
            "--value-col",
            "volume",
            "--mode",
            "statistics",
            "--freq",
            "weekly",
            "--start-month",
            "10",
            "--focus-year",
            "2020",
            "--cumulative",
        ]);

        let Some(CliCommand::Analyze(analyze)) = args.command else {
            panic!("expected the analyze subcommand");
        };
        let request = analyze.into_request();
        assert_eq!(request.mode, AnalysisMode::Statistics);
        assert_eq!(request.frequency, Frequency::Weekly);
        assert_eq!(request.start_month, 10);
        assert_eq!(request.focus_year, Some(2020));
        assert!(request.cumulative);
        assert_eq!(request.date_format, DateFormat::DayFirst);
    }

    #[test]
    fn strftime_pattern_is_accepted_as_a_date_format() {
        let args = LaunchProfileArgs::parse_from([
            "bbapp",
            "analyze",
            "--input",
            "/data/volumes.csv",
            "--time-col",
            "time",
            "--value-col",
            "volume",
            "--date-format",
            "%d.%m.%Y",
        ]);

        let Some(CliCommand::Analyze(analyze)) = args.command else {
            panic!("expected the analyze subcommand");
        };
        let request = analyze.into_request();
        assert_eq!(request.date_format, DateFormat::Custom("%d.%m.%Y".into()));
    }

    #[test]
    fn unknown_date_format_is_rejected() {
        let error = parse_date_format("backwards").expect_err("should reject unknown names");
        assert!(error.contains("backwards"));
    }

    #[test]
    fn global_config_flag_reaches_subcommands() {
        let args =
            LaunchProfileArgs::parse_from(["bbapp", "check", "--config", "/etc/bbapp/bbapp.toml"]);
        let command = args.into_command().expect("parsing should succeed");

        match command {
            ParsedCommand::Cli { config_path, .. } => {
                assert_eq!(config_path, PathBuf::from("/etc/bbapp/bbapp.toml"));
            }
            other => panic!("Unexpected command: {other:?}"),
        }
    }
}
