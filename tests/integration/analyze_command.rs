use std::fs;

use serde_json::Value;
use tempfile::tempdir;

use crate::common::{fixture, run_bbapp};

fn sample_args<'a>(extra: &[&'a str]) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "analyze".into(),
        "--input".into(),
        fixture("tests/fixtures/chronicle_sample.csv"),
        "--time-col".into(),
        "time".into(),
        "--value-col".into(),
        "volume".into(),
    ];
    args.extend(extra.iter().map(|arg| arg.to_string()));
    args
}

async fn run_analyze(extra: &[&str]) -> std::process::Output {
    let args = sample_args(extra);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    run_bbapp(&args, &[]).await.expect("analyze should run")
}

#[tokio::test]
async fn historical_mode_emits_the_loaded_series() {
    let output = run_analyze(&[]).await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let result: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(result["mode"], "historical");
    assert_eq!(result["value_label"], "volume");
    let observations = result["observations"]
        .as_array()
        .expect("observations should be an array");
    assert_eq!(observations.len(), 24);
    assert_eq!(observations[0]["date"], "2019-01-01");
    assert_eq!(observations[0]["value"], 1.0);
}

#[tokio::test]
async fn annual_cycle_mode_groups_monthly_buckets_per_year() {
    let output = run_analyze(&["--mode", "annual-cycle", "--freq", "monthly"]).await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let result: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(result["mode"], "annual_cycle");
    let years = result["years"].as_array().expect("years should be an array");
    assert_eq!(years.len(), 2);
    assert_eq!(years[0]["cycle_year"], 2019);
    assert_eq!(
        years[0]["buckets"]
            .as_array()
            .expect("buckets should be an array")
            .len(),
        12
    );
}

#[tokio::test]
async fn statistics_mode_holds_out_the_focus_year() {
    let output = run_analyze(&[
        "--mode",
        "statistics",
        "--freq",
        "monthly",
        "--focus-year",
        "2020",
    ])
    .await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let result: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(result["mode"], "statistics");
    assert_eq!(result["focus_year"], 2020);
    let rows = result["rows"].as_array().expect("rows should be an array");
    assert_eq!(rows.len(), 12);
    // One historical year, so the distribution collapses onto 2019.
    assert_eq!(rows[0]["min"], 1.0);
    assert_eq!(rows[0]["max"], 1.0);
    assert_eq!(rows[0]["focus"], 13.0);
}

#[tokio::test]
async fn statistics_mode_without_a_focus_year_fails() {
    let output = run_analyze(&["--mode", "statistics", "--freq", "monthly"]).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("focus year"), "stderr: {stderr}");
}

#[tokio::test]
async fn results_can_be_written_to_a_file() {
    let temp = tempdir().expect("can create temporary directory");
    let destination = temp.path().join("result.json");

    let output = run_analyze(&["--output", &destination.display().to_string()]).await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"status\": \"written\""), "stdout: {stdout}");

    let written = fs::read_to_string(&destination).expect("result file should exist");
    let result: Value = serde_json::from_str(&written).expect("file should hold JSON");
    assert_eq!(result["mode"], "historical");
}

#[tokio::test]
async fn missing_column_fails_with_the_column_name() {
    let input = fixture("tests/fixtures/chronicle_sample.csv");
    let args = [
        "analyze",
        "--input",
        input.as_str(),
        "--time-col",
        "time",
        "--value-col",
        "discharge",
    ];
    let output = run_bbapp(&args, &[]).await.expect("analyze should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("discharge"), "stderr: {stderr}");
}
