use std::{
    fs,
    net::TcpListener,
    path::{Path, PathBuf},
    process::Output,
};

use anyhow::{Context, Result};
use bbapp::lib::paths;
use tokio::process::Command;

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_bbapp");

pub fn fixture(relative: &str) -> String {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    root.join(relative).display().to_string()
}

pub async fn run_bbapp(args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
    let mut command = Command::new(BINARY_PATH);
    command.args(args);
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().await.context("failed to run bbapp")
}

/// A complete launchable setup inside a temporary directory.
pub struct LaunchSetup {
    pub toolchain_root: PathBuf,
    pub env_prefix: PathBuf,
    pub entry_script: PathBuf,
    pub config_path: PathBuf,
    pub port: u16,
}

/// Lay out a fake conda installation plus a matching config file.
pub fn scaffold_launch_setup(dir: &Path, env_name: &str) -> Result<LaunchSetup> {
    let toolchain_root = dir.join("miniconda3");
    let env_prefix = paths::environment_prefix(&toolchain_root, env_name);
    let bin_dir = paths::bin_dir(&env_prefix);
    fs::create_dir_all(&bin_dir).context("failed to create environment bin directory")?;
    fs::write(bin_dir.join(paths::APP_BINARY_NAME), "")
        .context("failed to create dashboard executable")?;

    let entry_script = dir.join("Home.py");
    fs::write(&entry_script, "").context("failed to create entry script")?;

    let port = free_port()?;
    let config_path = dir.join("bbapp.toml");
    fs::write(
        &config_path,
        format!(
            r#"[toolchain]
root = "{}"

[environment]
name = "{env_name}"

[app]
entry_script = "{}"

[server]
host = "127.0.0.1"
port = {port}

[launcher]
open_browser = false
"#,
            toolchain_root.display(),
            entry_script.display(),
        ),
    )
    .context("failed to write config file")?;

    Ok(LaunchSetup {
        toolchain_root,
        env_prefix,
        entry_script,
        config_path,
        port,
    })
}

fn free_port() -> Result<u16> {
    let listener =
        TcpListener::bind(("127.0.0.1", 0)).context("failed to bind an ephemeral port")?;
    Ok(listener.local_addr()?.port())
}
