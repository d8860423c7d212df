use std::fs;

use tempfile::tempdir;

use crate::common::{run_bbapp, scaffold_launch_setup};

#[tokio::test]
async fn check_passes_against_a_complete_setup() {
    let temp = tempdir().expect("can create temporary directory");
    let setup =
        scaffold_launch_setup(temp.path(), "bbapp").expect("can scaffold the launch setup");

    let output = run_bbapp(
        &["check", "--config", &setup.config_path.display().to_string()],
        &[],
    )
    .await
    .expect("check should run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "stdout: {stdout}\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        stdout.contains("\"status\": \"passed\""),
        "stdout: {stdout}"
    );
}

#[tokio::test]
async fn check_fails_when_the_environment_is_missing() {
    let temp = tempdir().expect("can create temporary directory");
    let setup =
        scaffold_launch_setup(temp.path(), "bbapp").expect("can scaffold the launch setup");
    fs::remove_dir_all(&setup.env_prefix).expect("can remove the environment directory");

    let output = run_bbapp(
        &["check", "--config", &setup.config_path.display().to_string()],
        &[],
    )
    .await
    .expect("check should run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!output.status.success(), "stdout: {stdout}");
    assert!(
        stdout.contains("\"status\": \"failed\""),
        "stdout: {stdout}"
    );
    assert!(stdout.contains("\"environment\""), "stdout: {stdout}");
}

#[tokio::test]
async fn check_honors_the_config_path_env_var() {
    let temp = tempdir().expect("can create temporary directory");
    let setup =
        scaffold_launch_setup(temp.path(), "bbapp").expect("can scaffold the launch setup");

    let output = run_bbapp(
        &["check"],
        &[(
            "BBAPP_CONFIG_PATH",
            &setup.config_path.display().to_string(),
        )],
    )
    .await
    .expect("check should run");

    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[tokio::test]
async fn check_reports_a_missing_config_file() {
    let temp = tempdir().expect("can create temporary directory");
    let missing = temp.path().join("nope.toml");

    let output = run_bbapp(&["check", "--config", &missing.display().to_string()], &[])
        .await
        .expect("check should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nope.toml"), "stderr: {stderr}");
}
