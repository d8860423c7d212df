use tracing::{debug, info};

use super::{LauncherConfig, CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH};

pub fn log_env_source(path: &std::path::Path, from_env: bool) {
    if from_env {
        info!(
            target: "bbapp::config",
            path = %path.display(),
            "Loading configuration using BBAPP_CONFIG_PATH environment variable"
        );
    } else {
        debug!(
            target: "bbapp::config",
            path = %path.display(),
            env = CONFIG_ENV_KEY,
            default = DEFAULT_CONFIG_PATH,
            "BBAPP_CONFIG_PATH not set; using default bbapp.toml"
        );
    }
}

pub fn log_loaded(config: &LauncherConfig) {
    info!(
        target: "bbapp::config",
        path = %config.source_path.display(),
        toolchain_root = %config.toolchain.root.display(),
        environment = %config.environment.name,
        entry_script = %config.app.entry_script.display(),
        host = %config.server.host,
        port = config.server.port,
        startup_timeout_secs = config.server.startup_timeout_secs,
        open_browser = config.launcher.open_browser,
        "Configuration file loaded successfully"
    );
}
