//! Open the served address in the default browser.

use std::process::{Command, Stdio};

use crate::lib::errors::LaunchError;

/// Platform command used to open a URL.
#[cfg(target_os = "linux")]
const OPEN_COMMAND: (&str, &[&str]) = ("xdg-open", &[]);
#[cfg(target_os = "macos")]
const OPEN_COMMAND: (&str, &[&str]) = ("open", &[]);
#[cfg(windows)]
const OPEN_COMMAND: (&str, &[&str]) = ("cmd", &["/C", "start", ""]);

/// Hand the URL to the OS opener without waiting for it.
pub fn open_in_browser(url: &str) -> Result<(), LaunchError> {
    let (program, args) = OPEN_COMMAND;
    Command::new(program)
        .args(args)
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|err| LaunchError::Browser {
            message: format!("`{program}` failed to start: {err}"),
        })
}

/// URL of the served dashboard.
pub fn served_url(host: &str, port: u16) -> String {
    format!("http://{host}:{port}/")
}
